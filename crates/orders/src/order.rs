use serde::{Deserialize, Serialize};

use storefront_core::{DomainResult, Entity, Money, OrderId};

/// Aggregate root: Order.
///
/// `total_paid` is derived from successful payment transactions and is updated
/// by provider integrations, so in-memory copies go stale after a payment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    total: Money,
    total_paid: Money,
}

impl Order {
    pub fn new(id: OrderId, total: Money) -> Self {
        let total_paid = Money::zero(total.currency());
        Self {
            id,
            total,
            total_paid,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn currency(&self) -> &str {
        self.total.currency()
    }

    pub fn total(&self) -> &Money {
        &self.total
    }

    pub fn total_paid(&self) -> &Money {
        &self.total_paid
    }

    pub fn missing_amount_to_be_paid(&self) -> DomainResult<Money> {
        self.total.saturating_sub(&self.total_paid)
    }

    pub fn is_fully_paid(&self) -> bool {
        self.total_paid.amount() >= self.total.amount()
    }

    pub fn record_payment(&mut self, amount: &Money) -> DomainResult<()> {
        self.total_paid = self.total_paid.checked_add(amount)?;
        Ok(())
    }

    pub fn record_refund(&mut self, amount: &Money) -> DomainResult<()> {
        self.total_paid = self.total_paid.saturating_sub(amount)?;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
