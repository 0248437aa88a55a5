//! Checkout mutations (application-level orchestration).
//!
//! Every mutation follows the same pipeline:
//!
//! ```text
//! load checkout → apply domain change → save → invalidate prices (once)
//! ```
//!
//! Prices are invalidated only after the change is persisted, and only for
//! mutations that succeeded. Domain failures come back as field-attributed
//! validation errors and leave the stored checkout untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use storefront_checkout::{Address, Checkout, LineInput};
use storefront_core::{
    CheckoutId, CheckoutLineId, Clock, DomainResult, ErrorCode, ValidationError,
};

use crate::checkout_prices::invalidate_checkout_prices;
use crate::store::{CheckoutStore, StoreError};

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("mutation rejected: {0:?}")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MutationError {
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            MutationError::Validation(errors) => errors,
            MutationError::Store(_) => &[],
        }
    }
}

pub struct CheckoutMutations<S, C> {
    store: S,
    clock: C,
}

impl<S, C> CheckoutMutations<S, C>
where
    S: CheckoutStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lines_add(&self, id: CheckoutId, lines: &[LineInput]) -> Result<Checkout, MutationError> {
        self.mutate(id, "lines_add", |checkout, now| checkout.add_lines(lines, now))
    }

    pub fn lines_update(&self, id: CheckoutId, lines: &[LineInput]) -> Result<Checkout, MutationError> {
        self.mutate(id, "lines_update", |checkout, now| checkout.update_lines(lines, now))
    }

    pub fn line_delete(&self, id: CheckoutId, line_id: CheckoutLineId) -> Result<Checkout, MutationError> {
        self.mutate(id, "line_delete", |checkout, now| checkout.delete_line(line_id, now))
    }

    pub fn shipping_address_update(
        &self,
        id: CheckoutId,
        address: Address,
    ) -> Result<Checkout, MutationError> {
        self.mutate(id, "shipping_address_update", |checkout, now| {
            checkout.set_shipping_address(address, now)
        })
    }

    pub fn billing_address_update(
        &self,
        id: CheckoutId,
        address: Address,
    ) -> Result<Checkout, MutationError> {
        self.mutate(id, "billing_address_update", |checkout, now| {
            checkout.set_billing_address(address, now)
        })
    }

    fn mutate(
        &self,
        id: CheckoutId,
        mutation: &'static str,
        change: impl FnOnce(&mut Checkout, DateTime<Utc>) -> DomainResult<()>,
    ) -> Result<Checkout, MutationError> {
        let mut checkout = match self.store.get(id) {
            Ok(checkout) => checkout,
            Err(StoreError::NotFound { .. }) => {
                return Err(MutationError::Validation(vec![ValidationError::new(
                    "checkout_id",
                    format!("Couldn't resolve to a node: {id}"),
                    ErrorCode::NotFound,
                )]));
            }
            Err(e) => return Err(e.into()),
        };

        change(&mut checkout, self.clock.now()).map_err(|e| {
            MutationError::Validation(vec![ValidationError::from_domain(e, "checkout")])
        })?;

        self.store.save(&checkout)?;
        invalidate_checkout_prices(&self.store, &self.clock, &mut checkout)?;

        debug!(checkout_id = %id, mutation, "checkout mutated");
        Ok(checkout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use storefront_core::{FixedClock, Money};

    use crate::store::InMemoryCheckoutStore;

    fn setup() -> (CheckoutMutations<InMemoryCheckoutStore, FixedClock>, CheckoutId) {
        let t0 = Utc.with_ymd_and_hms(2020, 12, 12, 12, 0, 0).unwrap();
        let store = InMemoryCheckoutStore::default();
        let checkout = Checkout::new(CheckoutId::new(), "USD", t0);
        store.save(&checkout).unwrap();
        (CheckoutMutations::new(store, FixedClock::new(t0)), checkout.id_typed())
    }

    fn line(variant: &str, quantity: u32) -> LineInput {
        LineInput {
            variant_id: variant.into(),
            quantity,
            unit_price: Money::new(100, "USD"),
        }
    }

    #[test]
    fn lines_add_persists_change() {
        let (mutations, id) = setup();
        let returned = mutations.lines_add(id, &[line("sku-1", 2)]).unwrap();

        let stored = mutations.store().get(id).unwrap();
        assert_eq!(stored, returned);
        assert_eq!(stored.line_for_variant("sku-1").unwrap().quantity, 2);
    }

    #[test]
    fn missing_checkout_is_a_not_found_validation_error() {
        let (mutations, _) = setup();
        let err = mutations.lines_add(CheckoutId::new(), &[line("sku-1", 1)]).unwrap_err();

        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].field, "checkout_id");
        assert_eq!(err.errors()[0].code, ErrorCode::NotFound);
    }

    #[test]
    fn rejected_change_leaves_stored_checkout_untouched() {
        let (mutations, id) = setup();
        let before = mutations.store().get(id).unwrap();

        let err = mutations.lines_add(id, &[line("sku-1", 0)]).unwrap_err();

        assert_eq!(err.errors()[0].code, ErrorCode::ZeroQuantity);
        assert_eq!(mutations.store().get(id).unwrap(), before);
    }
}
