//! Payment provider boundary.

pub mod dummy;

pub use dummy::DummyGateway;

use std::sync::Arc;

use storefront_core::Money;
use storefront_orders::{Payment, PaymentOperationError, Transaction};

/// A payment provider integration.
///
/// Implementations are blocking; timeout policy belongs to the integration.
/// They may update stored payments and orders as a side effect (e.g. bump an
/// order's `total_paid` after a capture), so callers must reload anything they
/// hold in memory afterwards.
pub trait PaymentGateway: Send + Sync {
    fn capture(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError>;

    fn refund(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError>;

    fn void(&self, payment: &Payment) -> Result<Transaction, PaymentOperationError>;
}

impl<G> PaymentGateway for Arc<G>
where
    G: PaymentGateway + ?Sized,
{
    fn capture(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError> {
        (**self).capture(payment, amount)
    }

    fn refund(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError> {
        (**self).refund(payment, amount)
    }

    fn void(&self, payment: &Payment) -> Result<Transaction, PaymentOperationError> {
        (**self).void(payment)
    }
}
