use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CheckoutId, CheckoutLineId, DomainError, DomainResult, Entity, Money};

use crate::address::Address;
use crate::pricing::{CheckoutPrices, PriceSnapshot};

/// Checkout line: product variant, quantity, prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub id: CheckoutLineId,
    pub variant_id: String,
    pub quantity: u32,
    pub unit_price: Money,
    /// Cached total; only trustworthy while the checkout's prices are fresh.
    pub total_price: Money,
}

/// Requested line change, as received from a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    pub variant_id: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Aggregate root: Checkout.
///
/// Holds a cached price snapshot. `price_expiration` marks the instant after
/// which that snapshot must be recomputed before it is shown or charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    id: CheckoutId,
    currency: String,
    lines: Vec<CheckoutLine>,
    shipping_address: Option<Address>,
    billing_address: Option<Address>,
    prices: CheckoutPrices,
    price_expiration: DateTime<Utc>,
    last_change: DateTime<Utc>,
}

impl Checkout {
    /// New, empty checkout. Nothing has been priced yet, so prices start expired.
    pub fn new(id: CheckoutId, currency: impl Into<String>, now: DateTime<Utc>) -> Self {
        let currency = currency.into();
        Self {
            id,
            prices: CheckoutPrices::zero(&currency),
            currency,
            lines: Vec::new(),
            shipping_address: None,
            billing_address: None,
            price_expiration: now,
            last_change: now,
        }
    }

    pub fn id_typed(&self) -> CheckoutId {
        self.id
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn lines(&self) -> &[CheckoutLine] {
        &self.lines
    }

    pub fn line_for_variant(&self, variant_id: &str) -> Option<&CheckoutLine> {
        self.lines.iter().find(|l| l.variant_id == variant_id)
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    pub fn billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }

    pub fn prices(&self) -> &CheckoutPrices {
        &self.prices
    }

    pub fn price_expiration(&self) -> DateTime<Utc> {
        self.price_expiration
    }

    pub fn last_change(&self) -> DateTime<Utc> {
        self.last_change
    }

    pub fn quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Cached prices are stale once `now` reaches `price_expiration`.
    pub fn is_price_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.price_expiration
    }

    pub fn set_price_expiration(&mut self, at: DateTime<Utc>) {
        self.price_expiration = at;
    }

    /// Store a freshly computed price snapshot, valid until `expires_at`.
    pub fn apply_price_snapshot(&mut self, snapshot: &PriceSnapshot, expires_at: DateTime<Utc>) {
        for (line_id, total) in &snapshot.line_totals {
            if let Some(line) = self.lines.iter_mut().find(|l| l.id == *line_id) {
                line.total_price = total.clone();
            }
        }
        self.prices = snapshot.prices.clone();
        self.price_expiration = expires_at;
    }

    fn validate_input(&self, input: &LineInput, allow_zero: bool) -> DomainResult<()> {
        if input.variant_id.trim().is_empty() {
            return Err(DomainError::required("variant_id"));
        }
        if input.quantity == 0 && !allow_zero {
            return Err(DomainError::zero_quantity("quantity"));
        }
        if input.unit_price.currency() != self.currency {
            return Err(DomainError::validation(
                "unit_price",
                format!(
                    "price currency {} does not match checkout currency {}",
                    input.unit_price.currency(),
                    self.currency
                ),
            ));
        }
        Ok(())
    }

    fn push_line(&mut self, input: &LineInput) {
        self.lines.push(CheckoutLine {
            id: CheckoutLineId::new(),
            variant_id: input.variant_id.clone(),
            quantity: input.quantity,
            unit_price: input.unit_price.clone(),
            total_price: Money::zero(&self.currency),
        });
    }

    /// Add lines; a variant already in the checkout has its quantity increased.
    ///
    /// All inputs are validated before anything changes.
    pub fn add_lines(&mut self, inputs: &[LineInput], now: DateTime<Utc>) -> DomainResult<()> {
        if inputs.is_empty() {
            return Err(DomainError::required("lines"));
        }
        let mut merged: HashMap<&str, u32> = self
            .lines
            .iter()
            .map(|l| (l.variant_id.as_str(), l.quantity))
            .collect();
        for input in inputs {
            self.validate_input(input, false)?;
            let quantity = merged.entry(input.variant_id.as_str()).or_insert(0);
            *quantity = quantity
                .checked_add(input.quantity)
                .ok_or_else(|| DomainError::validation("quantity", "quantity too large"))?;
        }

        for input in inputs {
            match self.lines.iter_mut().find(|l| l.variant_id == input.variant_id) {
                Some(line) => {
                    line.quantity += input.quantity;
                    line.unit_price = input.unit_price.clone();
                }
                None => self.push_line(input),
            }
        }

        self.last_change = now;
        Ok(())
    }

    /// Set line quantities. Zero removes the line; unknown variants are added.
    pub fn update_lines(&mut self, inputs: &[LineInput], now: DateTime<Utc>) -> DomainResult<()> {
        if inputs.is_empty() {
            return Err(DomainError::required("lines"));
        }
        for input in inputs {
            self.validate_input(input, true)?;
        }

        for input in inputs {
            let existing = self.lines.iter().position(|l| l.variant_id == input.variant_id);
            match (existing, input.quantity) {
                (Some(idx), 0) => {
                    self.lines.remove(idx);
                }
                (Some(idx), quantity) => {
                    let line = &mut self.lines[idx];
                    line.quantity = quantity;
                    line.unit_price = input.unit_price.clone();
                }
                (None, 0) => {}
                (None, _) => self.push_line(input),
            }
        }

        self.last_change = now;
        Ok(())
    }

    pub fn delete_line(&mut self, line_id: CheckoutLineId, now: DateTime<Utc>) -> DomainResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| DomainError::not_found("line_id"))?;
        self.lines.remove(idx);
        self.last_change = now;
        Ok(())
    }

    pub fn set_shipping_address(&mut self, address: Address, now: DateTime<Utc>) -> DomainResult<()> {
        address.validate()?;
        self.shipping_address = Some(address);
        self.last_change = now;
        Ok(())
    }

    pub fn set_billing_address(&mut self, address: Address, now: DateTime<Utc>) -> DomainResult<()> {
        address.validate()?;
        self.billing_address = Some(address);
        self.last_change = now;
        Ok(())
    }
}

impl Entity for Checkout {
    type Id = CheckoutId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
