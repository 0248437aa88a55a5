//! Orders & payments domain module.
//!
//! Business rules for placed orders, the payments made against them and the
//! append-only audit trail of order events. Pure domain logic: provider calls
//! and storage live in `storefront-infra`.

pub mod events;
pub mod order;
pub mod payment;

pub use events::{OrderEvent, OrderEventKind, OrderEventParameters};
pub use order::Order;
pub use payment::{
    ChargeStatus, Payment, PaymentError, PaymentOperationError, Transaction, TransactionKind,
};
