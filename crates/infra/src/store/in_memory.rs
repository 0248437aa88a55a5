use std::collections::HashMap;
use std::sync::RwLock;

use storefront_checkout::Checkout;
use storefront_core::{CheckoutId, Entity, OrderId, PaymentId};
use storefront_orders::{Order, Payment};

use super::r#trait::{CheckoutPatch, CheckoutStore, OrderStore, PaymentStore, StoreError};

/// In-memory record store keyed by entity id.
///
/// Intended for tests/dev. Reads hand out clones; writes replace or patch the
/// stored record under the write lock.
#[derive(Debug)]
pub struct InMemoryStore<E: Entity> {
    records: RwLock<HashMap<E::Id, E>>,
    entity: &'static str,
}

pub type InMemoryCheckoutStore = InMemoryStore<Checkout>;
pub type InMemoryOrderStore = InMemoryStore<Order>;
pub type InMemoryPaymentStore = InMemoryStore<Payment>;

impl<E> InMemoryStore<E>
where
    E: Entity + Clone,
{
    pub fn new(entity: &'static str) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            entity,
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load(&self, id: E::Id) -> Result<E, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(self.entity, id))
    }

    fn put(&self, record: &E) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(*record.id(), record.clone());
        Ok(())
    }

    fn update(&self, id: E::Id, f: impl FnOnce(&mut E)) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(self.entity, id))?;
        f(record);
        Ok(())
    }
}

impl Default for InMemoryStore<Checkout> {
    fn default() -> Self {
        Self::new("checkout")
    }
}

impl Default for InMemoryStore<Order> {
    fn default() -> Self {
        Self::new("order")
    }
}

impl Default for InMemoryStore<Payment> {
    fn default() -> Self {
        Self::new("payment")
    }
}

impl CheckoutStore for InMemoryStore<Checkout> {
    fn get(&self, id: CheckoutId) -> Result<Checkout, StoreError> {
        self.load(id)
    }

    fn save(&self, checkout: &Checkout) -> Result<(), StoreError> {
        self.put(checkout)
    }

    fn patch(&self, id: CheckoutId, patch: CheckoutPatch) -> Result<(), StoreError> {
        self.update(id, |stored| match patch {
            CheckoutPatch::PriceExpiration(at) => stored.set_price_expiration(at),
            CheckoutPatch::Prices {
                snapshot,
                price_expiration,
            } => stored.apply_price_snapshot(&snapshot, price_expiration),
        })
    }
}

impl OrderStore for InMemoryStore<Order> {
    fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        self.load(id)
    }

    fn save(&self, order: &Order) -> Result<(), StoreError> {
        self.put(order)
    }
}

impl PaymentStore for InMemoryStore<Payment> {
    fn get(&self, id: PaymentId) -> Result<Payment, StoreError> {
        self.load(id)
    }

    fn save(&self, payment: &Payment) -> Result<(), StoreError> {
        self.put(payment)
    }
}
