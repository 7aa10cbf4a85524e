//! Ledger service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ledger::{
    errors::LedgerError,
    models::{Order, OrderStatus, Transaction, TransactionStatus},
};

/// Keyed store for orders and their payment transactions.
///
/// Status transitions are monotonic: once a transaction reaches SUCCESS or
/// FAILED it never changes again, regardless of later callbacks.
#[automock]
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Record a freshly created order/transaction pair in PENDING state.
    async fn record(&self, order: Order, transaction: Transaction);

    /// Look up a transaction by its gateway uuid.
    async fn transaction(&self, uuid: &str) -> Option<Transaction>;

    /// Look up a transaction together with its owning order.
    async fn transaction_with_order(&self, uuid: &str) -> Option<(Transaction, Order)>;

    /// Transition a transaction and its order to SUCCESS / PAID, stamping
    /// the verification time. Terminal transactions are left untouched and
    /// returned as stored.
    async fn mark_success(
        &self,
        uuid: &str,
        transaction_code: &str,
    ) -> Result<Transaction, LedgerError>;

    /// Transition a transaction and its order to FAILED / PAYMENT_FAILED.
    /// Terminal transactions are left untouched and returned as stored.
    async fn mark_failure(&self, uuid: &str) -> Result<Transaction, LedgerError>;

    /// Snapshot of all orders in insertion order.
    async fn orders(&self) -> Vec<Order>;
}

#[derive(Debug, Default)]
struct LedgerState {
    orders: FxHashMap<String, Order>,
    order_ids: Vec<String>,
    transactions: FxHashMap<String, Transaction>,
}

/// In-memory ledger.
///
/// A single lock guards both maps so read-modify-write transitions on a
/// transaction/order pair are atomic under concurrent callbacks.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerService for InMemoryLedger {
    async fn record(&self, order: Order, transaction: Transaction) {
        let mut state = self.state.write().await;

        state.order_ids.push(order.id.clone());
        state
            .transactions
            .insert(transaction.transaction_uuid.clone(), transaction);
        state.orders.insert(order.id.clone(), order);
    }

    async fn transaction(&self, uuid: &str) -> Option<Transaction> {
        self.state.read().await.transactions.get(uuid).cloned()
    }

    async fn transaction_with_order(&self, uuid: &str) -> Option<(Transaction, Order)> {
        let state = self.state.read().await;

        let transaction = state.transactions.get(uuid)?.clone();
        let order = state.orders.get(&transaction.order_id)?.clone();

        Some((transaction, order))
    }

    async fn mark_success(
        &self,
        uuid: &str,
        transaction_code: &str,
    ) -> Result<Transaction, LedgerError> {
        let mut state = self.state.write().await;

        let transaction = state.transactions.get_mut(uuid).ok_or(LedgerError::NotFound)?;

        if transaction.status.is_terminal() {
            debug!(uuid, "ignoring success transition on terminal transaction");

            return Ok(transaction.clone());
        }

        let now = Timestamp::now();

        transaction.status = TransactionStatus::Success;
        transaction.transaction_code = Some(transaction_code.to_owned());
        transaction.verified_at = Some(now);

        let transaction = transaction.clone();

        if let Some(order) = state.orders.get_mut(&transaction.order_id) {
            order.status = OrderStatus::Paid;
            order.transaction_code = Some(transaction_code.to_owned());
            order.payment_verified_at = Some(now);
        }

        Ok(transaction)
    }

    async fn mark_failure(&self, uuid: &str) -> Result<Transaction, LedgerError> {
        let mut state = self.state.write().await;

        let transaction = state.transactions.get_mut(uuid).ok_or(LedgerError::NotFound)?;

        if transaction.status.is_terminal() {
            debug!(uuid, "ignoring failure transition on terminal transaction");

            return Ok(transaction.clone());
        }

        transaction.status = TransactionStatus::Failed;
        transaction.failed_at = Some(Timestamp::now());

        let transaction = transaction.clone();

        if let Some(order) = state.orders.get_mut(&transaction.order_id) {
            order.status = OrderStatus::PaymentFailed;
        }

        Ok(transaction)
    }

    async fn orders(&self) -> Vec<Order> {
        let state = self.state.read().await;

        state
            .order_ids
            .iter()
            .filter_map(|id| state.orders.get(id).cloned())
            .collect()
    }
}
