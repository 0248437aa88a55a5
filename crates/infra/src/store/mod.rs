//! Record storage boundary for checkouts, orders and payments.
//!
//! Ports are synchronous and storage-agnostic; the in-memory adapters are meant
//! for tests/dev.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryCheckoutStore, InMemoryOrderStore, InMemoryPaymentStore, InMemoryStore};
pub use r#trait::{CheckoutPatch, CheckoutStore, OrderStore, PaymentStore, StoreError};
