//! Reconciliation service.
//!
//! Drives the per-transaction state machine off asynchronous gateway
//! callbacks: `PENDING -> SUCCESS` on a verified COMPLETE callback,
//! `PENDING -> FAILED` otherwise. Terminal states absorb later callbacks
//! without changing.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    domain::{
        ledger::{LedgerError, LedgerService, models::TransactionStatus},
        reconciliation::models::{
            CallbackOutcome, CallbackPayload, FailureReason, GatewayStatus, GatewayStatusKind,
        },
        signature::Signer,
    },
    gateway::EsewaConfig,
    ids,
};

/// Field order the gateway uses when a callback omits its own declaration.
const DEFAULT_INBOUND_SIGNED_FIELD_NAMES: &str =
    "transaction_code,status,total_amount,transaction_uuid,product_code,signed_field_names";

#[automock]
#[async_trait]
pub trait ReconciliationService: Send + Sync {
    /// Handle the base64 `data` payload eSewa appends to the success
    /// callback. Never errors; every path resolves to a redirect outcome.
    async fn success_callback(&self, encoded: &str) -> CallbackOutcome;

    /// Handle the failure callback for a (possibly unknown) transaction
    /// uuid. Unknown uuids are logged, not errors.
    async fn failure_callback(&self, transaction_uuid: &str) -> CallbackOutcome;

    /// Simulated eSewa transaction-status probe.
    async fn gateway_status(
        &self,
        product_code: &str,
        total_amount: &str,
        transaction_uuid: &str,
    ) -> GatewayStatus;
}

/// Reconciliation against the shared ledger using the eSewa signer.
pub struct EsewaReconciliation {
    signer: Signer,
    ledger: Arc<dyn LedgerService>,
    strict_verification: bool,
}

impl EsewaReconciliation {
    #[must_use]
    pub fn new(config: &EsewaConfig, ledger: Arc<dyn LedgerService>) -> Self {
        Self {
            signer: Signer::new(config.secret_key.clone()),
            ledger,
            strict_verification: config.strict_verification,
        }
    }

    fn decode(encoded: &str) -> Option<CallbackPayload> {
        let bytes = BASE64.decode(encoded).ok()?;

        serde_json::from_slice(&bytes).ok()
    }
}

#[async_trait]
impl ReconciliationService for EsewaReconciliation {
    async fn success_callback(&self, encoded: &str) -> CallbackOutcome {
        if encoded.is_empty() {
            warn!("success callback without encoded data");

            return CallbackOutcome::failure(FailureReason::MissingData);
        }

        let Some(payload) = Self::decode(encoded) else {
            warn!("failed to decode success callback payload");

            return CallbackOutcome::failure(FailureReason::InvalidResponse);
        };

        let (
            Some(transaction_code),
            Some(status),
            Some(_total_amount),
            Some(transaction_uuid),
            Some(_product_code),
        ) = (
            payload.transaction_code.as_deref(),
            payload.status.as_deref(),
            payload.total_amount.as_deref(),
            payload.transaction_uuid.as_deref(),
            payload.product_code.as_deref(),
        )
        else {
            warn!("missing required parameters in success callback");

            return CallbackOutcome::failure(FailureReason::MissingParams);
        };

        let signed_field_names = payload
            .signed_field_names
            .as_deref()
            .unwrap_or(DEFAULT_INBOUND_SIGNED_FIELD_NAMES);
        let received_signature = payload.signature.as_deref().unwrap_or_default();

        let verified = self.signer.verify(
            |name| payload.field(name),
            signed_field_names,
            received_signature,
        );

        if !verified {
            if self.strict_verification {
                warn!(transaction_uuid, "rejecting callback with bad signature");

                return CallbackOutcome::failure(FailureReason::InvalidSignature);
            }

            warn!(
                transaction_uuid,
                "signature mismatch on callback, continuing (strict verification disabled)"
            );
        }

        if status != "COMPLETE" {
            warn!(transaction_uuid, status, "payment not complete");

            return CallbackOutcome::failure(FailureReason::PaymentIncomplete);
        }

        match self.ledger.mark_success(transaction_uuid, transaction_code).await {
            Ok(transaction) => {
                info!(transaction_uuid, transaction_code, "payment reconciled");

                CallbackOutcome::Success {
                    order_id: transaction.order_id,
                    transaction_code: transaction
                        .transaction_code
                        .unwrap_or_else(|| transaction_code.to_owned()),
                }
            }
            Err(LedgerError::NotFound) => {
                warn!(transaction_uuid, "success callback for unknown transaction");

                CallbackOutcome::failure(FailureReason::UnknownTransaction)
            }
        }
    }

    async fn failure_callback(&self, transaction_uuid: &str) -> CallbackOutcome {
        if transaction_uuid.is_empty() {
            warn!("failure callback without transaction uuid");
        } else {
            match self.ledger.mark_failure(transaction_uuid).await {
                Ok(_) => info!(transaction_uuid, "payment marked failed"),
                Err(LedgerError::NotFound) => {
                    warn!(transaction_uuid, "failure callback for unknown transaction");
                }
            }
        }

        CallbackOutcome::Failure { reason: None }
    }

    async fn gateway_status(
        &self,
        product_code: &str,
        total_amount: &str,
        transaction_uuid: &str,
    ) -> GatewayStatus {
        let mut probe = GatewayStatus {
            product_code: product_code.to_owned(),
            transaction_uuid: transaction_uuid.to_owned(),
            total_amount: total_amount.to_owned(),
            status: GatewayStatusKind::NotFound,
            ref_id: None,
        };

        let Some(transaction) = self.ledger.transaction(transaction_uuid).await else {
            return probe;
        };

        match transaction.status {
            TransactionStatus::Success => {
                probe.status = GatewayStatusKind::Complete;
                probe.ref_id = Some(
                    transaction
                        .transaction_code
                        .unwrap_or_else(ids::new_ref_id),
                );
            }
            TransactionStatus::Pending => probe.status = GatewayStatusKind::Pending,
            TransactionStatus::Failed => probe.status = GatewayStatusKind::Failed,
        }

        probe
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            ledger::{
                InMemoryLedger,
                models::{
                    CartItem, DeliveryLocation, Order, OrderStatus, OrderTotals, Transaction,
                },
            },
            pricing::DeliverySpeed,
            signature::Signer,
        },
        gateway::{CallbackUrls, SecretKey, TEST_SECRET_KEY},
    };

    use super::*;

    const UUID: &str = "PASAL-250101-AB12CD";
    const ORDER_ID: &str = "ORD1A2B3C4D";

    fn config(strict: bool) -> EsewaConfig {
        EsewaConfig::test(CallbackUrls {
            success_url: "http://localhost:5005/payment/success".to_owned(),
            failure_url: "http://localhost:5005/payment/failure".to_owned(),
            success_page_url: "/payment-success.html".to_owned(),
            failure_page_url: "/payment-failed.html".to_owned(),
        })
        .with_strict_verification(strict)
    }

    async fn ledger_with_pending() -> Arc<InMemoryLedger> {
        let ledger = Arc::new(InMemoryLedger::new());
        let now = Timestamp::UNIX_EPOCH;
        let total = Decimal::from(240);

        let order = Order {
            id: ORDER_ID.to_owned(),
            transaction_uuid: UUID.to_owned(),
            cart: vec![CartItem {
                id: 1,
                name: "Basmati Rice".to_owned(),
                price: Decimal::from(100),
                qty: 2,
            }],
            location: DeliveryLocation {
                district: "kathmandu".to_owned(),
                area: None,
            },
            delivery_speed: DeliverySpeed::Standard,
            totals: OrderTotals {
                amount: Decimal::from(200),
                tax_amount: Decimal::ZERO,
                product_service_charge: Decimal::ZERO,
                product_delivery_charge: Decimal::from(40),
                discount: Decimal::ZERO,
                total_amount: total,
            },
            promo_code: None,
            status: OrderStatus::Pending,
            created_at: now,
            transaction_code: None,
            payment_verified_at: None,
        };

        let transaction = Transaction {
            transaction_uuid: UUID.to_owned(),
            order_id: ORDER_ID.to_owned(),
            total_amount: total,
            status: TransactionStatus::Pending,
            created_at: now,
            transaction_code: None,
            verified_at: None,
            failed_at: None,
        };

        ledger.record(order, transaction).await;

        ledger
    }

    fn signed_payload(uuid: &str, status: &str) -> CallbackPayload {
        let mut payload = CallbackPayload {
            transaction_code: Some("0007X9L".to_owned()),
            status: Some(status.to_owned()),
            total_amount: Some("240".to_owned()),
            transaction_uuid: Some(uuid.to_owned()),
            product_code: Some("EPAYTEST".to_owned()),
            signed_field_names: Some(DEFAULT_INBOUND_SIGNED_FIELD_NAMES.to_owned()),
            signature: None,
        };

        let signer = Signer::new(SecretKey::new(TEST_SECRET_KEY));
        let fields: Vec<(&str, &str)> = DEFAULT_INBOUND_SIGNED_FIELD_NAMES
            .split(',')
            .filter_map(|name| payload.field(name).map(|value| (name, value)))
            .collect();

        payload.signature = Some(signer.sign(&fields));

        payload
    }

    fn encode(payload: &CallbackPayload) -> TestResult<String> {
        Ok(BASE64.encode(serde_json::to_vec(payload)?))
    }

    #[tokio::test]
    async fn verified_complete_callback_reconciles_the_payment() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger.clone());

        let outcome = service
            .success_callback(&encode(&signed_payload(UUID, "COMPLETE"))?)
            .await;

        assert_eq!(
            outcome,
            CallbackOutcome::Success {
                order_id: ORDER_ID.to_owned(),
                transaction_code: "0007X9L".to_owned(),
            }
        );

        let (transaction, order) = ledger
            .transaction_with_order(UUID)
            .await
            .ok_or("pair should exist")?;

        assert_eq!(transaction.status, TransactionStatus::Success);
        assert_eq!(order.status, OrderStatus::Paid);

        Ok(())
    }

    #[tokio::test]
    async fn empty_data_is_missing_data() {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let outcome = service.success_callback("").await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::MissingData)
        );
    }

    #[tokio::test]
    async fn undecodable_data_is_invalid_response() {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let outcome = service.success_callback("not-base64!!!").await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::InvalidResponse)
        );
    }

    #[tokio::test]
    async fn sparse_payload_is_missing_params() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let payload = CallbackPayload {
            status: Some("COMPLETE".to_owned()),
            ..CallbackPayload::default()
        };

        let outcome = service.success_callback(&encode(&payload)?).await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::MissingParams)
        );

        Ok(())
    }

    #[tokio::test]
    async fn strict_mode_rejects_a_bad_signature() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger.clone());

        let mut payload = signed_payload(UUID, "COMPLETE");
        payload.signature = Some("tampered".to_owned());

        let outcome = service.success_callback(&encode(&payload)?).await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::InvalidSignature)
        );

        let transaction = ledger.transaction(UUID).await.ok_or("must exist")?;

        assert_eq!(transaction.status, TransactionStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn lax_mode_continues_past_a_bad_signature() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(false), ledger.clone());

        let mut payload = signed_payload(UUID, "COMPLETE");
        payload.signature = Some("tampered".to_owned());

        let outcome = service.success_callback(&encode(&payload)?).await;

        assert!(matches!(outcome, CallbackOutcome::Success { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn non_complete_status_is_payment_incomplete() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger.clone());

        let outcome = service
            .success_callback(&encode(&signed_payload(UUID, "PENDING"))?)
            .await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::PaymentIncomplete)
        );

        let transaction = ledger.transaction(UUID).await.ok_or("must exist")?;

        assert_eq!(transaction.status, TransactionStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_transaction_redirects_to_failure_without_state_change() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let outcome = service
            .success_callback(&encode(&signed_payload("PASAL-UNKNOWN", "COMPLETE"))?)
            .await;

        assert_eq!(
            outcome,
            CallbackOutcome::failure(FailureReason::UnknownTransaction)
        );

        Ok(())
    }

    #[tokio::test]
    async fn terminal_transaction_absorbs_later_callbacks() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger.clone());

        let encoded = encode(&signed_payload(UUID, "COMPLETE"))?;

        service.success_callback(&encoded).await;
        service.failure_callback(UUID).await;

        let transaction = ledger.transaction(UUID).await.ok_or("must exist")?;

        assert_eq!(transaction.status, TransactionStatus::Success);

        Ok(())
    }

    #[tokio::test]
    async fn failure_callback_marks_known_transactions() -> TestResult {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger.clone());

        let outcome = service.failure_callback(UUID).await;

        assert_eq!(outcome, CallbackOutcome::Failure { reason: None });

        let (transaction, order) = ledger
            .transaction_with_order(UUID)
            .await
            .ok_or("pair should exist")?;

        assert_eq!(transaction.status, TransactionStatus::Failed);
        assert_eq!(order.status, OrderStatus::PaymentFailed);

        Ok(())
    }

    #[tokio::test]
    async fn failure_callback_for_unknown_uuid_still_redirects() {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let outcome = service.failure_callback("PASAL-UNKNOWN").await;

        assert_eq!(outcome, CallbackOutcome::Failure { reason: None });
    }

    #[tokio::test]
    async fn probe_reports_complete_with_ref_id_after_success() -> TestResult {
        let ledger = ledger_with_pending().await;
        ledger.mark_success(UUID, "0007X9L").await?;

        let service = EsewaReconciliation::new(&config(true), ledger);
        let probe = service.gateway_status("EPAYTEST", "240", UUID).await;

        assert_eq!(probe.status, GatewayStatusKind::Complete);
        assert_eq!(probe.ref_id.as_deref(), Some("0007X9L"));

        Ok(())
    }

    #[tokio::test]
    async fn probe_reports_pending_without_ref_id() {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let probe = service.gateway_status("EPAYTEST", "240", UUID).await;

        assert_eq!(probe.status, GatewayStatusKind::Pending);
        assert_eq!(probe.ref_id, None);
    }

    #[tokio::test]
    async fn probe_reports_not_found_for_unknown_uuid() {
        let ledger = ledger_with_pending().await;
        let service = EsewaReconciliation::new(&config(true), ledger);

        let probe = service
            .gateway_status("EPAYTEST", "240", "PASAL-UNKNOWN")
            .await;

        assert_eq!(probe.status, GatewayStatusKind::NotFound);
        assert_eq!(probe.ref_id, None);
    }
}
