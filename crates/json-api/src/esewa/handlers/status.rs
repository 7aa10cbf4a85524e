//! eSewa Status Probe Handler
//!
//! Simulates the eSewa transaction-status API against the local ledger, so
//! storefronts can poll the same shape they would get from the gateway.

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use pasal_app::domain::reconciliation::models::{GatewayStatus, GatewayStatusKind};

use crate::{extensions::*, state::State};

/// Gateway Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GatewayStatusResponse {
    pub product_code: String,

    pub transaction_uuid: String,

    pub total_amount: String,

    /// COMPLETE, PENDING, FAILED or NOT_FOUND
    pub status: String,

    /// Gateway reference, present once the payment completed
    pub ref_id: Option<String>,
}

fn status_label(status: GatewayStatusKind) -> String {
    match status {
        GatewayStatusKind::Complete => "COMPLETE",
        GatewayStatusKind::Pending => "PENDING",
        GatewayStatusKind::Failed => "FAILED",
        GatewayStatusKind::NotFound => "NOT_FOUND",
    }
    .to_owned()
}

impl From<GatewayStatus> for GatewayStatusResponse {
    fn from(probe: GatewayStatus) -> Self {
        Self {
            product_code: probe.product_code,
            transaction_uuid: probe.transaction_uuid,
            total_amount: probe.total_amount,
            status: status_label(probe.status),
            ref_id: probe.ref_id,
        }
    }
}

/// eSewa Status Probe Handler
#[endpoint(
    tags("esewa"),
    summary = "Probe a transaction the way the eSewa status API would",
    responses(
        (status_code = StatusCode::OK, description = "Transaction status"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing required parameters"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown transaction"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product_code: QueryParam<String, false>,
    total_amount: QueryParam<String, false>,
    transaction_uuid: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<GatewayStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let (Some(product_code), Some(total_amount), Some(transaction_uuid)) = (
        product_code.into_inner(),
        total_amount.into_inner(),
        transaction_uuid.into_inner(),
    ) else {
        return Err(StatusError::bad_request().brief("Missing required parameters"));
    };

    let probe = state
        .app
        .reconciliation
        .gateway_status(&product_code, &total_amount, &transaction_uuid)
        .await;

    if probe.status == GatewayStatusKind::NotFound {
        res.status_code(StatusCode::NOT_FOUND);
    }

    Ok(Json(probe.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pasal_app::domain::reconciliation::MockReconciliationService;

    use crate::test_helpers::{service_with_state, state_with_reconciliation};

    use super::*;

    fn make_service(reconciliation: MockReconciliationService) -> Service {
        service_with_state(
            state_with_reconciliation(reconciliation),
            Router::with_path("api/esewa/status").get(handler),
        )
    }

    fn probe(status: GatewayStatusKind, ref_id: Option<&str>) -> GatewayStatus {
        GatewayStatus {
            product_code: "EPAYTEST".to_owned(),
            transaction_uuid: "PASAL-260828-1A2B3C".to_owned(),
            total_amount: "240".to_owned(),
            status,
            ref_id: ref_id.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_complete_payment_reports_a_ref_id() -> TestResult {
        let mut reconciliation = MockReconciliationService::new();

        reconciliation
            .expect_gateway_status()
            .once()
            .withf(|code: &str, amount: &str, uuid: &str| {
                code == "EPAYTEST" && amount == "240" && uuid == "PASAL-260828-1A2B3C"
            })
            .return_once(|_, _, _| probe(GatewayStatusKind::Complete, Some("REF1A2B3C")));

        let mut res = TestClient::get(
            "http://example.com/api/esewa/status?product_code=EPAYTEST&total_amount=240&transaction_uuid=PASAL-260828-1A2B3C",
        )
        .send(&make_service(reconciliation))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: GatewayStatusResponse = res.take_json().await?;

        assert_eq!(body.status, "COMPLETE");
        assert_eq!(body.ref_id.as_deref(), Some("REF1A2B3C"));

        Ok(())
    }

    #[tokio::test]
    async fn test_pending_payment_has_no_ref_id() -> TestResult {
        let mut reconciliation = MockReconciliationService::new();

        reconciliation
            .expect_gateway_status()
            .once()
            .return_once(|_, _, _| probe(GatewayStatusKind::Pending, None));

        let mut res = TestClient::get(
            "http://example.com/api/esewa/status?product_code=EPAYTEST&total_amount=240&transaction_uuid=PASAL-260828-1A2B3C",
        )
        .send(&make_service(reconciliation))
        .await;

        let body: GatewayStatusResponse = res.take_json().await?;

        assert_eq!(body.status, "PENDING");
        assert_eq!(body.ref_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_404_with_a_body() -> TestResult {
        let mut reconciliation = MockReconciliationService::new();

        reconciliation
            .expect_gateway_status()
            .once()
            .return_once(|_, _, _| probe(GatewayStatusKind::NotFound, None));

        let mut res = TestClient::get(
            "http://example.com/api/esewa/status?product_code=EPAYTEST&total_amount=240&transaction_uuid=PASAL-260828-1A2B3C",
        )
        .send(&make_service(reconciliation))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        let body: GatewayStatusResponse = res.take_json().await?;

        assert_eq!(body.status, "NOT_FOUND");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_params_return_400() {
        let reconciliation = MockReconciliationService::new();

        let res = TestClient::get("http://example.com/api/esewa/status?product_code=EPAYTEST")
            .send(&make_service(reconciliation))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
