use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use storefront_core::{DomainError, DomainResult, Entity, Money, OrderId, PaymentId};

/// Charge lifecycle of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChargeStatus {
    NotCharged,
    PartiallyCharged,
    FullyCharged,
    PartiallyRefunded,
    FullyRefunded,
    Cancelled,
}

/// A single payment against an order, as tracked by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    order_id: OrderId,
    gateway: String,
    total: Money,
    captured_amount: Money,
    charge_status: ChargeStatus,
    is_active: bool,
}

impl Payment {
    pub fn new(id: PaymentId, order_id: OrderId, gateway: impl Into<String>, total: Money) -> Self {
        let captured_amount = Money::zero(total.currency());
        Self {
            id,
            order_id,
            gateway: gateway.into(),
            total,
            captured_amount,
            charge_status: ChargeStatus::NotCharged,
            is_active: true,
        }
    }

    pub fn id_typed(&self) -> PaymentId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    pub fn total(&self) -> &Money {
        &self.total
    }

    pub fn captured_amount(&self) -> &Money {
        &self.captured_amount
    }

    pub fn charge_status(&self) -> ChargeStatus {
        self.charge_status
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn can_capture(&self) -> bool {
        self.is_active && self.charge_status == ChargeStatus::NotCharged
    }

    pub fn can_void(&self) -> bool {
        self.is_active && self.charge_status == ChargeStatus::NotCharged
    }

    pub fn can_refund(&self) -> bool {
        self.is_active
            && !self.captured_amount.is_zero()
            && matches!(
                self.charge_status,
                ChargeStatus::PartiallyCharged
                    | ChargeStatus::FullyCharged
                    | ChargeStatus::PartiallyRefunded
            )
    }

    /// Amount still available to capture.
    pub fn charge_amount(&self) -> DomainResult<Money> {
        self.total.saturating_sub(&self.captured_amount)
    }

    /// Evolve state from a provider transaction. Failed transactions change nothing.
    pub fn apply_transaction(&mut self, txn: &Transaction) -> DomainResult<()> {
        if txn.payment_id != self.id {
            return Err(DomainError::invariant("transaction belongs to another payment"));
        }
        if !txn.is_success {
            return Ok(());
        }

        match txn.kind {
            TransactionKind::Capture => {
                self.captured_amount = self.captured_amount.checked_add(&txn.amount)?;
                self.charge_status = if self.captured_amount.amount() >= self.total.amount() {
                    ChargeStatus::FullyCharged
                } else {
                    ChargeStatus::PartiallyCharged
                };
            }
            TransactionKind::Refund => {
                self.captured_amount = self.captured_amount.saturating_sub(&txn.amount)?;
                self.charge_status = if self.captured_amount.is_zero() {
                    ChargeStatus::FullyRefunded
                } else {
                    ChargeStatus::PartiallyRefunded
                };
            }
            TransactionKind::Void => {
                self.is_active = false;
                self.charge_status = ChargeStatus::Cancelled;
            }
        }
        Ok(())
    }
}

impl Entity for Payment {
    type Id = PaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Capture,
    Refund,
    Void,
}

/// Provider response to a payment action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub payment_id: PaymentId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub is_success: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The provider rejected or could not complete an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PaymentError {
    pub message: String,
    /// Provider-specific code, when the provider returns one.
    pub code: Option<String>,
}

impl PaymentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Failure of a payment operation.
///
/// `Payment` and `Value` are recoverable: callers turn them into a
/// field-attributed validation error. `Other` is anything else and must be
/// propagated untouched.
#[derive(Debug, Error)]
pub enum PaymentOperationError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Malformed or invalid argument detected while running the operation.
    #[error("{0}")]
    Value(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PaymentOperationError {
    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }
}

impl From<DomainError> for PaymentOperationError {
    fn from(value: DomainError) -> Self {
        Self::Value(value.to_string())
    }
}
