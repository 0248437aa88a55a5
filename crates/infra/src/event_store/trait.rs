use serde::{Deserialize, Serialize};
use std::sync::Arc;

use storefront_core::OrderId;
use storefront_orders::OrderEvent;

use crate::store::StoreError;

/// An order event that has been persisted and assigned its position.
///
/// `sequence_number` is per order, starts at 1 and never has gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrderEvent {
    pub sequence_number: u64,
    pub event: OrderEvent,
}

/// Append-only store of order audit events.
pub trait OrderEventStore: Send + Sync {
    /// Append one event to its order's stream.
    fn append(&self, event: OrderEvent) -> Result<StoredOrderEvent, StoreError>;

    /// All events of an order, in append order. Empty if none were recorded.
    fn list(&self, order_id: OrderId) -> Result<Vec<StoredOrderEvent>, StoreError>;
}

impl<S> OrderEventStore for Arc<S>
where
    S: OrderEventStore + ?Sized,
{
    fn append(&self, event: OrderEvent) -> Result<StoredOrderEvent, StoreError> {
        (**self).append(event)
    }

    fn list(&self, order_id: OrderId) -> Result<Vec<StoredOrderEvent>, StoreError> {
        (**self).list(order_id)
    }
}
