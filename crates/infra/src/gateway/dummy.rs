use std::sync::RwLock;

use uuid::Uuid;

use storefront_core::{Clock, Money};
use storefront_orders::{
    Payment, PaymentError, PaymentOperationError, Transaction, TransactionKind,
};

use super::PaymentGateway;
use crate::store::{OrderStore, PaymentStore, StoreError};

fn storage_failure(e: StoreError) -> PaymentOperationError {
    PaymentOperationError::Other(anyhow::Error::new(e))
}

/// Provider stand-in for tests/dev.
///
/// Approves everything unless told to decline. Limits are checked against the
/// stored payment, not the caller's copy. On success it writes the updated
/// payment and the order's new `total_paid` straight to the stores, the way a
/// real integration does from inside the provider call.
pub struct DummyGateway<O, P, C> {
    orders: O,
    payments: P,
    clock: C,
    decline: RwLock<Option<PaymentError>>,
}

impl<O, P, C> DummyGateway<O, P, C>
where
    O: OrderStore,
    P: PaymentStore,
    C: Clock,
{
    pub fn new(orders: O, payments: P, clock: C) -> Self {
        Self {
            orders,
            payments,
            clock,
            decline: RwLock::new(None),
        }
    }

    /// Make every following call fail with a provider error.
    pub fn decline_with(&self, error: PaymentError) {
        if let Ok(mut guard) = self.decline.write() {
            *guard = Some(error);
        }
    }

    pub fn approve_all(&self) {
        if let Ok(mut guard) = self.decline.write() {
            *guard = None;
        }
    }

    fn check_declined(&self) -> Result<(), PaymentOperationError> {
        match self.decline.read() {
            Ok(guard) => match guard.as_ref() {
                Some(err) => Err(err.clone().into()),
                None => Ok(()),
            },
            Err(_) => Err(PaymentOperationError::Other(anyhow::anyhow!(
                "dummy gateway lock poisoned"
            ))),
        }
    }

    fn transaction(&self, payment: &Payment, kind: TransactionKind, amount: Money) -> Transaction {
        Transaction {
            id: Uuid::now_v7(),
            payment_id: payment.id_typed(),
            kind,
            amount,
            is_success: true,
            error: None,
            created_at: self.clock.now(),
        }
    }

    /// Current stored state of `payment`; the caller's copy may be stale.
    fn stored(&self, payment: &Payment) -> Result<Payment, PaymentOperationError> {
        self.payments.get(payment.id_typed()).map_err(storage_failure)
    }

    /// Apply a successful transaction to the stored payment and order.
    fn commit(&self, mut payment: Payment, txn: &Transaction) -> Result<(), PaymentOperationError> {
        payment.apply_transaction(txn)?;
        self.payments.save(&payment).map_err(storage_failure)?;

        if txn.kind == TransactionKind::Void {
            return Ok(());
        }

        let mut order = self.orders.get(payment.order_id()).map_err(storage_failure)?;
        match txn.kind {
            TransactionKind::Capture => order.record_payment(&txn.amount)?,
            _ => order.record_refund(&txn.amount)?,
        }
        self.orders.save(&order).map_err(storage_failure)?;
        Ok(())
    }
}

impl<O, P, C> PaymentGateway for DummyGateway<O, P, C>
where
    O: OrderStore,
    P: PaymentStore,
    C: Clock,
{
    fn capture(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError> {
        if amount.is_zero() {
            return Err(PaymentOperationError::value("amount must be greater than zero"));
        }
        let stored = self.stored(payment)?;
        if !stored.is_active() {
            return Err(PaymentOperationError::value("This payment cannot be captured."));
        }
        if amount.amount() > stored.charge_amount()?.amount() {
            return Err(PaymentOperationError::value(
                "Unable to charge more than un-captured amount.",
            ));
        }
        self.check_declined()?;

        let txn = self.transaction(&stored, TransactionKind::Capture, amount.clone());
        self.commit(stored, &txn)?;
        Ok(txn)
    }

    fn refund(&self, payment: &Payment, amount: &Money) -> Result<Transaction, PaymentOperationError> {
        if amount.is_zero() {
            return Err(PaymentOperationError::value("amount must be greater than zero"));
        }
        let stored = self.stored(payment)?;
        if amount.amount() > stored.captured_amount().amount() {
            return Err(PaymentOperationError::value(
                "Cannot refund more than captured.",
            ));
        }
        self.check_declined()?;

        let txn = self.transaction(&stored, TransactionKind::Refund, amount.clone());
        self.commit(stored, &txn)?;
        Ok(txn)
    }

    fn void(&self, payment: &Payment) -> Result<Transaction, PaymentOperationError> {
        let stored = self.stored(payment)?;
        if !stored.can_void() {
            return Err(PaymentOperationError::value(
                "Only pre-authorized transactions can be voided.",
            ));
        }
        self.check_declined()?;

        let txn = self.transaction(&stored, TransactionKind::Void, Money::zero(stored.total().currency()));
        self.commit(stored, &txn)?;
        Ok(txn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storefront_core::{OrderId, PaymentId, SystemClock};
    use storefront_orders::{ChargeStatus, Order};

    use crate::store::{InMemoryOrderStore, InMemoryPaymentStore};

    type Gateway = DummyGateway<Arc<InMemoryOrderStore>, Arc<InMemoryPaymentStore>, SystemClock>;

    fn setup() -> (Gateway, Arc<InMemoryOrderStore>, Arc<InMemoryPaymentStore>, Payment) {
        let orders = Arc::new(InMemoryOrderStore::default());
        let payments = Arc::new(InMemoryPaymentStore::default());
        let order = Order::new(OrderId::new(), Money::new(5000, "USD"));
        let payment = Payment::new(PaymentId::new(), order.id_typed(), "dummy", Money::new(5000, "USD"));
        orders.save(&order).unwrap();
        payments.save(&payment).unwrap();
        let gateway = DummyGateway::new(orders.clone(), payments.clone(), SystemClock);
        (gateway, orders, payments, payment)
    }

    #[test]
    fn capture_updates_stored_payment_and_order() {
        let (gateway, orders, payments, payment) = setup();

        let txn = gateway.capture(&payment, &Money::new(5000, "USD")).unwrap();

        assert!(txn.is_success);
        assert_eq!(
            payments.get(payment.id_typed()).unwrap().charge_status(),
            ChargeStatus::FullyCharged
        );
        assert_eq!(
            orders.get(payment.order_id()).unwrap().total_paid(),
            &Money::new(5000, "USD")
        );
    }

    #[test]
    fn declined_capture_is_a_payment_error_and_changes_nothing() {
        let (gateway, orders, _payments, payment) = setup();
        gateway.decline_with(PaymentError::new("Card declined"));

        let err = gateway.capture(&payment, &Money::new(100, "USD")).unwrap_err();

        assert!(matches!(err, PaymentOperationError::Payment(ref e) if e.message == "Card declined"));
        assert!(orders.get(payment.order_id()).unwrap().total_paid().is_zero());

        gateway.approve_all();
        assert!(gateway.capture(&payment, &Money::new(100, "USD")).is_ok());
    }

    #[test]
    fn over_capture_is_a_value_error() {
        let (gateway, _orders, _payments, payment) = setup();
        let err = gateway.capture(&payment, &Money::new(9000, "USD")).unwrap_err();
        assert!(matches!(err, PaymentOperationError::Value(_)));
    }

    #[test]
    fn second_capture_with_stale_payment_is_rejected() {
        let (gateway, orders, payments, payment) = setup();

        gateway.capture(&payment, &Money::new(5000, "USD")).unwrap();
        let err = gateway.capture(&payment, &Money::new(5000, "USD")).unwrap_err();

        assert!(matches!(err, PaymentOperationError::Value(_)));
        assert_eq!(
            payments.get(payment.id_typed()).unwrap().captured_amount(),
            &Money::new(5000, "USD")
        );
        assert_eq!(
            orders.get(payment.order_id()).unwrap().total_paid(),
            &Money::new(5000, "USD")
        );
    }

    #[test]
    fn refund_with_stale_payment_is_limited_by_stored_capture() {
        let (gateway, orders, _payments, payment) = setup();
        gateway.capture(&payment, &Money::new(5000, "USD")).unwrap();
        let captured = gateway.stored(&payment).unwrap();

        gateway.refund(&captured, &Money::new(5000, "USD")).unwrap();
        let err = gateway.refund(&captured, &Money::new(5000, "USD")).unwrap_err();

        assert!(matches!(err, PaymentOperationError::Value(ref m) if m == "Cannot refund more than captured."));
        assert!(orders.get(payment.order_id()).unwrap().total_paid().is_zero());
    }

    #[test]
    fn void_after_capture_is_rejected_even_with_stale_payment() {
        let (gateway, _orders, payments, payment) = setup();
        gateway.capture(&payment, &Money::new(100, "USD")).unwrap();

        let err = gateway.void(&payment).unwrap_err();

        assert!(matches!(err, PaymentOperationError::Value(_)));
        assert!(payments.get(payment.id_typed()).unwrap().is_active());
    }

    #[test]
    fn missing_stored_payment_is_an_other_error() {
        let (gateway, _orders, _payments, _payment) = setup();
        let stray = Payment::new(PaymentId::new(), OrderId::new(), "dummy", Money::new(10, "USD"));
        let err = gateway.void(&stray).unwrap_err();
        assert!(matches!(err, PaymentOperationError::Other(_)));
    }
}
