use std::collections::HashMap;
use std::sync::RwLock;

use storefront_core::OrderId;
use storefront_orders::OrderEvent;

use super::r#trait::{OrderEventStore, StoredOrderEvent};
use crate::store::StoreError;

/// In-memory append-only order event store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryOrderEventStore {
    streams: RwLock<HashMap<OrderId, Vec<StoredOrderEvent>>>,
}

impl InMemoryOrderEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events across all orders.
    pub fn len(&self) -> usize {
        self.streams
            .read()
            .map(|s| s.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderEventStore for InMemoryOrderEventStore {
    fn append(&self, event: OrderEvent) -> Result<StoredOrderEvent, StoreError> {
        let mut streams = self.streams.write().map_err(|_| StoreError::Poisoned)?;

        let stream = streams.entry(event.order_id).or_default();
        let next = stream.last().map(|e| e.sequence_number).unwrap_or(0) + 1;

        let stored = StoredOrderEvent {
            sequence_number: next,
            event,
        };
        stream.push(stored.clone());
        Ok(stored)
    }

    fn list(&self, order_id: OrderId) -> Result<Vec<StoredOrderEvent>, StoreError> {
        let streams = self.streams.read().map_err(|_| StoreError::Poisoned)?;
        Ok(streams.get(&order_id).cloned().unwrap_or_default())
    }
}
