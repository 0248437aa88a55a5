//! Infrastructure & application layer: storage ports, payment gateway port,
//! configuration, and the services that tie the pure domain crates to them.

pub mod checkout_mutations;
pub mod checkout_prices;
pub mod config;
pub mod event_store;
pub mod gateway;
pub mod payment_actions;
pub mod store;

pub use checkout_mutations::{CheckoutMutations, MutationError};
pub use checkout_prices::{
    PricingError, fetch_checkout_prices_if_expired, force_prices_recalculation,
    invalidate_checkout_prices,
};
pub use config::{ConfigError, StorefrontConfig};
pub use event_store::{InMemoryOrderEventStore, OrderEventStore, StoredOrderEvent};
pub use gateway::{DummyGateway, PaymentGateway};
pub use payment_actions::{PaymentActionError, PaymentActions, Requestor};
pub use store::{
    CheckoutPatch, CheckoutStore, InMemoryCheckoutStore, InMemoryOrderStore,
    InMemoryPaymentStore, InMemoryStore, OrderStore, PaymentStore, StoreError,
};
