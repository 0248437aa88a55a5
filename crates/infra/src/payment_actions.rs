//! Payment action wrapper.
//!
//! Runs a payment operation against an order and normalizes its outcome:
//!
//! - success: the order is reloaded from storage (the provider call may have
//!   changed `total_paid`) and the operation's result is returned unchanged;
//! - `PaymentOperationError::Payment` / `Value`: one failure event is appended
//!   to the order and a `payment` / `PAYMENT_ERROR` validation error is returned;
//! - `PaymentOperationError::Other`: returned untouched, nothing recorded.
//!
//! Nothing here is idempotent: every call runs the operation once.

use thiserror::Error;
use tracing::warn;

use storefront_core::{AppId, Clock, Money, UserId, ValidationError};
use storefront_events::Event;
use storefront_orders::{
    Order, OrderEvent, OrderEventKind, Payment, PaymentOperationError, Transaction,
};

use crate::event_store::OrderEventStore;
use crate::gateway::PaymentGateway;
use crate::store::{OrderStore, StoreError};

#[derive(Debug, Error)]
pub enum PaymentActionError {
    /// The provider or the operation rejected the action.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Not a payment failure; propagated as-is.
    #[error(transparent)]
    Other(anyhow::Error),
}

/// Who asked for the action. Both empty means system-initiated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requestor {
    pub user: Option<UserId>,
    pub app: Option<AppId>,
}

impl Requestor {
    pub fn user(id: UserId) -> Self {
        Self {
            user: Some(id),
            app: None,
        }
    }

    pub fn app(id: AppId) -> Self {
        Self {
            user: None,
            app: Some(id),
        }
    }

    pub fn system() -> Self {
        Self::default()
    }
}

pub struct PaymentActions<O, E, G, C> {
    orders: O,
    events: E,
    gateway: G,
    clock: C,
}

impl<O, E, G, C> PaymentActions<O, E, G, C>
where
    O: OrderStore,
    E: OrderEventStore,
    G: PaymentGateway,
    C: Clock,
{
    pub fn new(orders: O, events: E, gateway: G, clock: C) -> Self {
        Self {
            orders,
            events,
            gateway,
            clock,
        }
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    /// Run `operation`, refreshing `order` on success and recording a
    /// `PaymentFailed` event on a payment or value failure.
    pub fn perform_payment_action<T>(
        &self,
        order: &mut Order,
        requestor: Requestor,
        payment: &Payment,
        operation: impl FnOnce() -> Result<T, PaymentOperationError>,
    ) -> Result<T, PaymentActionError> {
        self.run(OrderEventKind::PaymentFailed, order, requestor, payment, operation)
    }

    /// Capture `amount` (or everything still capturable) through the gateway.
    pub fn try_capture(
        &self,
        order: &mut Order,
        requestor: Requestor,
        payment: &Payment,
        amount: Option<Money>,
    ) -> Result<Transaction, PaymentActionError> {
        self.run(OrderEventKind::PaymentCaptureFailed, order, requestor, payment, || {
            if !payment.can_capture() {
                return Err(PaymentOperationError::value("This payment cannot be captured."));
            }
            let available = payment.charge_amount()?;
            let amount = match amount {
                Some(requested) => requested.min(&available)?,
                None => available,
            };
            self.gateway.capture(payment, &amount)
        })
    }

    pub fn try_refund(
        &self,
        order: &mut Order,
        requestor: Requestor,
        payment: &Payment,
        amount: Money,
    ) -> Result<Transaction, PaymentActionError> {
        self.run(OrderEventKind::PaymentRefundFailed, order, requestor, payment, || {
            if !payment.can_refund() {
                return Err(PaymentOperationError::value("This payment cannot be refunded."));
            }
            self.gateway.refund(payment, &amount)
        })
    }

    pub fn try_void(
        &self,
        order: &mut Order,
        requestor: Requestor,
        payment: &Payment,
    ) -> Result<Transaction, PaymentActionError> {
        self.run(OrderEventKind::PaymentVoidFailed, order, requestor, payment, || {
            if !payment.can_void() {
                return Err(PaymentOperationError::value("Only pre-authorized transactions can be voided."));
            }
            self.gateway.void(payment)
        })
    }

    fn run<T>(
        &self,
        failure_kind: OrderEventKind,
        order: &mut Order,
        requestor: Requestor,
        payment: &Payment,
        operation: impl FnOnce() -> Result<T, PaymentOperationError>,
    ) -> Result<T, PaymentActionError> {
        let message = match operation() {
            Ok(result) => {
                *order = self.orders.get(order.id_typed())?;
                return Ok(result);
            }
            Err(PaymentOperationError::Other(e)) => return Err(PaymentActionError::Other(e)),
            Err(e @ (PaymentOperationError::Payment(_) | PaymentOperationError::Value(_))) => {
                e.to_string()
            }
        };

        let event = OrderEvent::payment_failure(
            failure_kind,
            order.id_typed(),
            requestor.user,
            requestor.app,
            message.clone(),
            payment,
            self.clock.now(),
        );
        warn!(
            order_id = %order.id_typed(),
            payment_id = %payment.id_typed(),
            event_type = event.event_type(),
            error = %message,
            "payment action failed"
        );
        self.events.append(event)?;

        Err(ValidationError::payment(message).into())
    }
}
