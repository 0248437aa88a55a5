use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use storefront_checkout::{Checkout, PriceSnapshot};
use storefront_core::{CheckoutId, OrderId, PaymentId};
use storefront_orders::{Order, Payment};

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to domain errors
/// (validation, invariants). Services propagate them unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Partial write against a stored checkout.
///
/// Each variant names the exact fields it touches; everything else on the stored
/// record is left as is, so a patch never clobbers a concurrent write to other
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutPatch {
    /// Only `price_expiration`.
    PriceExpiration(DateTime<Utc>),
    /// Cached totals, line totals and `price_expiration`.
    Prices {
        snapshot: PriceSnapshot,
        price_expiration: DateTime<Utc>,
    },
}

pub trait CheckoutStore: Send + Sync {
    fn get(&self, id: CheckoutId) -> Result<Checkout, StoreError>;

    /// Full-record write (insert or replace).
    fn save(&self, checkout: &Checkout) -> Result<(), StoreError>;

    /// Partial-field write. Fails with `NotFound` if the checkout is not stored.
    fn patch(&self, id: CheckoutId, patch: CheckoutPatch) -> Result<(), StoreError>;
}

pub trait OrderStore: Send + Sync {
    fn get(&self, id: OrderId) -> Result<Order, StoreError>;
    fn save(&self, order: &Order) -> Result<(), StoreError>;
}

pub trait PaymentStore: Send + Sync {
    fn get(&self, id: PaymentId) -> Result<Payment, StoreError>;
    fn save(&self, payment: &Payment) -> Result<(), StoreError>;
}

impl<S> CheckoutStore for Arc<S>
where
    S: CheckoutStore + ?Sized,
{
    fn get(&self, id: CheckoutId) -> Result<Checkout, StoreError> {
        (**self).get(id)
    }

    fn save(&self, checkout: &Checkout) -> Result<(), StoreError> {
        (**self).save(checkout)
    }

    fn patch(&self, id: CheckoutId, patch: CheckoutPatch) -> Result<(), StoreError> {
        (**self).patch(id, patch)
    }
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        (**self).get(id)
    }

    fn save(&self, order: &Order) -> Result<(), StoreError> {
        (**self).save(order)
    }
}

impl<S> PaymentStore for Arc<S>
where
    S: PaymentStore + ?Sized,
{
    fn get(&self, id: PaymentId) -> Result<Payment, StoreError> {
        (**self).get(id)
    }

    fn save(&self, payment: &Payment) -> Result<(), StoreError> {
        (**self).save(payment)
    }
}
