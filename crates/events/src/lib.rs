//! Domain events: immutable, append-only facts recorded by business operations.

pub mod event;

pub use event::{Event, EventRecord};
