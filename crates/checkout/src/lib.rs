//! Checkout domain module.
//!
//! This crate contains the rules for a shopper's in-progress cart: lines,
//! addresses and the cached price snapshot with its expiration. It is pure
//! domain logic (no IO, no storage).

pub mod address;
pub mod checkout;
pub mod pricing;

pub use address::Address;
pub use checkout::{Checkout, CheckoutLine, LineInput};
pub use pricing::{CheckoutPrices, FlatRateCalculator, PriceCalculator, PriceSnapshot};
