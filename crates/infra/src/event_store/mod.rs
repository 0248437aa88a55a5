//! Append-only order event storage.
//!
//! Events are facts: the store can append and list them, never update or
//! delete them.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryOrderEventStore;
pub use r#trait::{OrderEventStore, StoredOrderEvent};
