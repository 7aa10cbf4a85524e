//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal_macros::dec;
use salvo::{affix_state::inject, prelude::*};

use pasal_app::{
    context::AppContext,
    domain::{
        checkout::MockCheckoutService,
        ledger::{
            MockLedgerService,
            models::{
                CartItem, DeliveryLocation, Order, OrderStatus, OrderTotals, Transaction,
                TransactionStatus,
            },
        },
        pricing::DeliverySpeed,
        reconciliation::MockReconciliationService,
    },
};

use crate::state::{RedirectPages, State};

pub(crate) fn test_pages() -> RedirectPages {
    RedirectPages {
        success: "/payment-success.html".to_owned(),
        failure: "/payment-failed.html".to_owned(),
    }
}

fn strict_checkout_mock() -> MockCheckoutService {
    let mut checkout = MockCheckoutService::new();

    checkout.expect_initiate().never();

    checkout
}

fn strict_ledger_mock() -> MockLedgerService {
    let mut ledger = MockLedgerService::new();

    ledger.expect_record().never();
    ledger.expect_transaction().never();
    ledger.expect_transaction_with_order().never();
    ledger.expect_mark_success().never();
    ledger.expect_mark_failure().never();
    ledger.expect_orders().never();

    ledger
}

fn strict_reconciliation_mock() -> MockReconciliationService {
    let mut reconciliation = MockReconciliationService::new();

    reconciliation.expect_success_callback().never();
    reconciliation.expect_failure_callback().never();
    reconciliation.expect_gateway_status().never();

    reconciliation
}

pub(crate) fn state_with_checkout(checkout: MockCheckoutService) -> Arc<State> {
    State::shared(
        AppContext {
            ledger: Arc::new(strict_ledger_mock()),
            checkout: Arc::new(checkout),
            reconciliation: Arc::new(strict_reconciliation_mock()),
        },
        test_pages(),
    )
}

pub(crate) fn state_with_ledger(ledger: MockLedgerService) -> Arc<State> {
    State::shared(
        AppContext {
            ledger: Arc::new(ledger),
            checkout: Arc::new(strict_checkout_mock()),
            reconciliation: Arc::new(strict_reconciliation_mock()),
        },
        test_pages(),
    )
}

pub(crate) fn state_with_reconciliation(
    reconciliation: MockReconciliationService,
) -> Arc<State> {
    State::shared(
        AppContext {
            ledger: Arc::new(strict_ledger_mock()),
            checkout: Arc::new(strict_checkout_mock()),
            reconciliation: Arc::new(reconciliation),
        },
        test_pages(),
    )
}

pub(crate) fn service_with_state(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

fn make_order(transaction_uuid: &str, status: OrderStatus) -> Order {
    Order {
        id: "ORD1A2B3C4D".to_owned(),
        transaction_uuid: transaction_uuid.to_owned(),
        cart: vec![CartItem {
            id: 1,
            name: "Momo".to_owned(),
            price: dec!(100),
            qty: 2,
        }],
        location: DeliveryLocation {
            district: "Kathmandu".to_owned(),
            area: None,
        },
        delivery_speed: DeliverySpeed::Standard,
        totals: OrderTotals {
            amount: dec!(200),
            tax_amount: dec!(0),
            product_service_charge: dec!(0),
            product_delivery_charge: dec!(40),
            discount: dec!(0),
            total_amount: dec!(240),
        },
        promo_code: None,
        status,
        created_at: Timestamp::UNIX_EPOCH,
        transaction_code: None,
        payment_verified_at: None,
    }
}

fn make_transaction(transaction_uuid: &str, status: TransactionStatus) -> Transaction {
    Transaction {
        transaction_uuid: transaction_uuid.to_owned(),
        order_id: "ORD1A2B3C4D".to_owned(),
        total_amount: dec!(240),
        status,
        created_at: Timestamp::UNIX_EPOCH,
        transaction_code: None,
        verified_at: None,
        failed_at: None,
    }
}

/// A reconciled transaction/order pair for a 240-total order.
pub(crate) fn make_paid_pair(transaction_uuid: &str) -> (Transaction, Order) {
    let mut transaction = make_transaction(transaction_uuid, TransactionStatus::Success);
    transaction.transaction_code = Some("000AWEO".to_owned());
    transaction.verified_at = Some(Timestamp::UNIX_EPOCH);

    let mut order = make_order(transaction_uuid, OrderStatus::Paid);
    order.transaction_code = Some("000AWEO".to_owned());
    order.payment_verified_at = Some(Timestamp::UNIX_EPOCH);

    (transaction, order)
}

/// A freshly initiated transaction/order pair.
pub(crate) fn make_pending_pair(transaction_uuid: &str) -> (Transaction, Order) {
    (
        make_transaction(transaction_uuid, TransactionStatus::Pending),
        make_order(transaction_uuid, OrderStatus::Pending),
    )
}
