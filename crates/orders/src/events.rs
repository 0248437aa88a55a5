//! Order audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::{AppId, OrderId, PaymentId, UserId};
use storefront_events::Event;

use crate::payment::Payment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderEventKind {
    PaymentFailed,
    PaymentCaptureFailed,
    PaymentRefundFailed,
    PaymentVoidFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEventParameters {
    pub message: Option<String>,
    pub payment_id: Option<PaymentId>,
    pub payment_gateway: Option<String>,
}

/// Immutable audit record attached to an order.
///
/// At most one of `user` / `app` is normally set; both are `None` for
/// system-initiated actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub id: Uuid,
    pub order_id: OrderId,
    pub date: DateTime<Utc>,
    pub kind: OrderEventKind,
    pub user: Option<UserId>,
    pub app: Option<AppId>,
    pub parameters: OrderEventParameters,
}

impl OrderEvent {
    /// A payment action against `payment` failed with `message`.
    pub fn payment_failure(
        kind: OrderEventKind,
        order_id: OrderId,
        user: Option<UserId>,
        app: Option<AppId>,
        message: impl Into<String>,
        payment: &Payment,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            order_id,
            date,
            kind,
            user,
            app,
            parameters: OrderEventParameters {
                message: Some(message.into()),
                payment_id: Some(payment.id_typed()),
                payment_gateway: Some(payment.gateway().to_string()),
            },
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.parameters.message.as_deref()
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            OrderEventKind::PaymentFailed => "order.payment_failed",
            OrderEventKind::PaymentCaptureFailed => "order.payment_capture_failed",
            OrderEventKind::PaymentRefundFailed => "order.payment_refund_failed",
            OrderEventKind::PaymentVoidFailed => "order.payment_void_failed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.date
    }
}
