//! Checkout price cache: invalidation and recomputation.
//!
//! A checkout's cached prices are fresh while `now < price_expiration`.
//! Invalidation moves the expiration to `now`; recomputation moves it to
//! `now + ttl`. Both persist through partial writes only.

use chrono::Duration;
use thiserror::Error;
use tracing::debug;

use storefront_checkout::{Checkout, PriceCalculator};
use storefront_core::{Clock, DomainError};

use crate::store::{CheckoutPatch, CheckoutStore, StoreError};

#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Force the checkout's cached prices to be treated as expired immediately.
///
/// Sets `price_expiration` to `clock.now()` on `checkout` and persists that
/// single field. Idempotent. Storage errors are returned unchanged.
pub fn invalidate_checkout_prices<S, C>(
    store: &S,
    clock: &C,
    checkout: &mut Checkout,
) -> Result<(), StoreError>
where
    S: CheckoutStore + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now();
    checkout.set_price_expiration(now);
    store.patch(checkout.id_typed(), CheckoutPatch::PriceExpiration(now))?;

    debug!(checkout_id = %checkout.id_typed(), price_expiration = %now, "checkout prices invalidated");
    Ok(())
}

/// Recompute and persist checkout prices unless the cached ones are still fresh.
///
/// Returns `true` when prices were recomputed. With `force_update` the
/// expiration is ignored.
pub fn fetch_checkout_prices_if_expired<S, P, C>(
    store: &S,
    calculator: &P,
    clock: &C,
    ttl: Duration,
    checkout: &mut Checkout,
    force_update: bool,
) -> Result<bool, PricingError>
where
    S: CheckoutStore + ?Sized,
    P: PriceCalculator + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now();
    if !force_update && !checkout.is_price_expired(now) {
        return Ok(false);
    }

    let price_expiration = now
        .checked_add_signed(ttl)
        .ok_or_else(|| DomainError::invariant("price expiration out of range"))?;
    let snapshot = calculator.calculate(checkout)?;

    checkout.apply_price_snapshot(&snapshot, price_expiration);
    store.patch(
        checkout.id_typed(),
        CheckoutPatch::Prices {
            snapshot,
            price_expiration,
        },
    )?;

    debug!(
        checkout_id = %checkout.id_typed(),
        total = %checkout.prices().total,
        price_expiration = %price_expiration,
        "checkout prices recomputed"
    );
    Ok(true)
}

/// Recompute prices regardless of `price_expiration`.
pub fn force_prices_recalculation<S, P, C>(
    store: &S,
    calculator: &P,
    clock: &C,
    ttl: Duration,
    checkout: &mut Checkout,
) -> Result<(), PricingError>
where
    S: CheckoutStore + ?Sized,
    P: PriceCalculator + ?Sized,
    C: Clock + ?Sized,
{
    fetch_checkout_prices_if_expired(store, calculator, clock, ttl, checkout, true).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use storefront_checkout::{FlatRateCalculator, LineInput, PriceSnapshot};
    use storefront_core::{CheckoutId, DomainResult, FixedClock, Money};

    use crate::store::InMemoryCheckoutStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 12, 12, 12, 0, 0).unwrap()
    }

    /// Counts calculations so tests can tell whether a recompute happened.
    #[derive(Default)]
    struct CountingCalculator {
        calls: AtomicUsize,
    }

    impl PriceCalculator for CountingCalculator {
        fn calculate(&self, checkout: &Checkout) -> DomainResult<PriceSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            FlatRateCalculator::new(0).calculate(checkout)
        }
    }

    fn stored_checkout(store: &InMemoryCheckoutStore) -> Checkout {
        let mut checkout = Checkout::new(CheckoutId::new(), "USD", t0());
        checkout
            .add_lines(
                &[LineInput {
                    variant_id: "sku-1".into(),
                    quantity: 2,
                    unit_price: Money::new(500, "USD"),
                }],
                t0(),
            )
            .unwrap();
        store.save(&checkout).unwrap();
        checkout
    }

    #[test]
    fn invalidate_sets_expiration_to_now_and_persists_it() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let mut checkout = stored_checkout(&store);

        checkout.set_price_expiration(t0() + Duration::minutes(5));
        store
            .patch(checkout.id_typed(), CheckoutPatch::PriceExpiration(checkout.price_expiration()))
            .unwrap();

        invalidate_checkout_prices(&store, &clock, &mut checkout).unwrap();

        assert_eq!(checkout.price_expiration(), t0());
        let reloaded = store.get(checkout.id_typed()).unwrap();
        assert_eq!(reloaded.price_expiration(), t0());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let mut checkout = stored_checkout(&store);

        invalidate_checkout_prices(&store, &clock, &mut checkout).unwrap();
        invalidate_checkout_prices(&store, &clock, &mut checkout).unwrap();

        assert_eq!(store.get(checkout.id_typed()).unwrap().price_expiration(), t0());
    }

    #[test]
    fn invalidate_unsaved_checkout_propagates_store_error() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let mut checkout = Checkout::new(CheckoutId::new(), "USD", t0());

        let err = invalidate_checkout_prices(&store, &clock, &mut checkout).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn fresh_prices_are_not_recomputed() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let calculator = CountingCalculator::default();
        let mut checkout = stored_checkout(&store);
        let ttl = Duration::hours(1);

        assert!(fetch_checkout_prices_if_expired(&store, &calculator, &clock, ttl, &mut checkout, false).unwrap());
        clock.advance(Duration::minutes(10));
        assert!(!fetch_checkout_prices_if_expired(&store, &calculator, &clock, ttl, &mut checkout, false).unwrap());

        assert_eq!(calculator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(checkout.price_expiration(), t0() + ttl);
    }

    #[test]
    fn invalidated_prices_are_recomputed_on_next_read() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let calculator = CountingCalculator::default();
        let mut checkout = stored_checkout(&store);
        let ttl = Duration::hours(1);

        fetch_checkout_prices_if_expired(&store, &calculator, &clock, ttl, &mut checkout, false).unwrap();
        clock.advance(Duration::minutes(1));
        invalidate_checkout_prices(&store, &clock, &mut checkout).unwrap();

        let recomputed =
            fetch_checkout_prices_if_expired(&store, &calculator, &clock, ttl, &mut checkout, false).unwrap();

        assert!(recomputed);
        assert_eq!(calculator.calls.load(Ordering::SeqCst), 2);
        let reloaded = store.get(checkout.id_typed()).unwrap();
        assert_eq!(reloaded.prices().total, Money::new(1000, "USD"));
        assert_eq!(reloaded.price_expiration(), clock.now() + ttl);
    }

    #[test]
    fn ttl_past_the_calendar_is_an_error_and_changes_nothing() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let calculator = CountingCalculator::default();
        let mut checkout = stored_checkout(&store);

        let err = fetch_checkout_prices_if_expired(
            &store,
            &calculator,
            &clock,
            Duration::seconds(9_000_000_000_000),
            &mut checkout,
            false,
        )
        .unwrap_err();

        assert!(matches!(err, PricingError::Domain(DomainError::InvariantViolation(_))));
        assert_eq!(calculator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.get(checkout.id_typed()).unwrap().price_expiration(), t0());
    }

    #[test]
    fn forced_recalculation_ignores_expiration() {
        let store = InMemoryCheckoutStore::default();
        let clock = FixedClock::new(t0());
        let calculator = CountingCalculator::default();
        let mut checkout = stored_checkout(&store);
        let ttl = Duration::hours(1);

        fetch_checkout_prices_if_expired(&store, &calculator, &clock, ttl, &mut checkout, false).unwrap();
        force_prices_recalculation(&store, &calculator, &clock, ttl, &mut checkout).unwrap();

        assert_eq!(calculator.calls.load(Ordering::SeqCst), 2);
    }
}
