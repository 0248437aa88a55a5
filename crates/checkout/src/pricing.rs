//! Checkout price calculation.
//!
//! Calculators are pure: they read a checkout and return a `PriceSnapshot`.
//! Deciding *when* to recompute (price expiration) and persisting the result
//! belongs to the caller.

use serde::{Deserialize, Serialize};

use storefront_core::{CheckoutLineId, DomainResult, Money};

use crate::checkout::Checkout;

/// Cached monetary totals of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPrices {
    pub subtotal: Money,
    pub shipping_price: Money,
    pub total: Money,
}

impl CheckoutPrices {
    pub fn zero(currency: &str) -> Self {
        Self {
            subtotal: Money::zero(currency),
            shipping_price: Money::zero(currency),
            total: Money::zero(currency),
        }
    }
}

/// Result of one price calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub prices: CheckoutPrices,
    pub line_totals: Vec<(CheckoutLineId, Money)>,
}

pub trait PriceCalculator: Send + Sync {
    fn calculate(&self, checkout: &Checkout) -> DomainResult<PriceSnapshot>;
}

impl<C> PriceCalculator for std::sync::Arc<C>
where
    C: PriceCalculator + ?Sized,
{
    fn calculate(&self, checkout: &Checkout) -> DomainResult<PriceSnapshot> {
        (**self).calculate(checkout)
    }
}

/// Unit price × quantity per line, plus one flat shipping charge once a
/// shipping address is known. No taxes or discounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRateCalculator {
    /// Shipping charge in minor units.
    pub shipping_rate: u64,
}

impl FlatRateCalculator {
    pub fn new(shipping_rate: u64) -> Self {
        Self { shipping_rate }
    }
}

impl PriceCalculator for FlatRateCalculator {
    fn calculate(&self, checkout: &Checkout) -> DomainResult<PriceSnapshot> {
        let currency = checkout.currency();
        let mut subtotal = Money::zero(currency);
        let mut line_totals = Vec::with_capacity(checkout.lines().len());

        for line in checkout.lines() {
            let total = line.unit_price.checked_mul(line.quantity)?;
            subtotal = subtotal.checked_add(&total)?;
            line_totals.push((line.id, total));
        }

        let shipping_price = if checkout.shipping_address().is_some() && !checkout.lines().is_empty() {
            Money::new(self.shipping_rate, currency)
        } else {
            Money::zero(currency)
        };
        let total = subtotal.checked_add(&shipping_price)?;

        Ok(PriceSnapshot {
            prices: CheckoutPrices {
                subtotal,
                shipping_price,
                total,
            },
            line_totals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::checkout::LineInput;
    use chrono::Utc;
    use storefront_core::CheckoutId;

    fn checkout_with_lines() -> Checkout {
        let now = Utc::now();
        let mut checkout = Checkout::new(CheckoutId::new(), "USD", now);
        checkout
            .add_lines(
                &[
                    LineInput {
                        variant_id: "sku-1".into(),
                        quantity: 3,
                        unit_price: Money::new(250, "USD"),
                    },
                    LineInput {
                        variant_id: "sku-2".into(),
                        quantity: 1,
                        unit_price: Money::new(1000, "USD"),
                    },
                ],
                now,
            )
            .unwrap();
        checkout
    }

    #[test]
    fn totals_without_shipping_address() {
        let snapshot = FlatRateCalculator::new(500)
            .calculate(&checkout_with_lines())
            .unwrap();

        assert_eq!(snapshot.prices.subtotal, Money::new(1750, "USD"));
        assert!(snapshot.prices.shipping_price.is_zero());
        assert_eq!(snapshot.prices.total, Money::new(1750, "USD"));
        assert_eq!(snapshot.line_totals.len(), 2);
    }

    #[test]
    fn shipping_is_charged_once_address_is_set() {
        let mut checkout = checkout_with_lines();
        let address = Address {
            first_name: "Jane".into(),
            street_address_1: "1 Loop".into(),
            city: "Cupertino".into(),
            postal_code: "95014".into(),
            country: "US".into(),
            ..Address::default()
        };
        checkout.set_shipping_address(address, Utc::now()).unwrap();

        let snapshot = FlatRateCalculator::new(500).calculate(&checkout).unwrap();
        assert_eq!(snapshot.prices.shipping_price, Money::new(500, "USD"));
        assert_eq!(snapshot.prices.total, Money::new(2250, "USD"));
    }

    #[test]
    fn applying_snapshot_updates_line_totals_and_expiration() {
        let mut checkout = checkout_with_lines();
        let snapshot = FlatRateCalculator::new(0).calculate(&checkout).unwrap();
        let expires = Utc::now() + chrono::Duration::hours(1);

        checkout.apply_price_snapshot(&snapshot, expires);

        assert_eq!(checkout.price_expiration(), expires);
        assert_eq!(
            checkout.line_for_variant("sku-1").unwrap().total_price,
            Money::new(750, "USD")
        );
        assert_eq!(checkout.prices(), &snapshot.prices);
    }
}
