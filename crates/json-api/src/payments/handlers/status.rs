//! Payment Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use pasal_app::domain::ledger::models::{Transaction, TransactionStatus};

use crate::{extensions::*, orders::index::OrderResponse, state::State};

/// Transaction Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransactionResponse {
    /// Gateway transaction uuid
    pub transaction_uuid: String,

    /// Internal order id
    pub order_id: String,

    pub total_amount: String,

    /// PENDING, SUCCESS or FAILED
    pub status: String,

    pub created_at: String,

    /// Gateway reference code, set on success
    pub transaction_code: Option<String>,

    pub verified_at: Option<String>,

    pub failed_at: Option<String>,
}

fn transaction_status_label(status: TransactionStatus) -> String {
    match status {
        TransactionStatus::Pending => "PENDING",
        TransactionStatus::Success => "SUCCESS",
        TransactionStatus::Failed => "FAILED",
    }
    .to_owned()
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            transaction_uuid: transaction.transaction_uuid,
            order_id: transaction.order_id,
            total_amount: transaction.total_amount.normalize().to_string(),
            status: transaction_status_label(transaction.status),
            created_at: transaction.created_at.to_string(),
            transaction_code: transaction.transaction_code,
            verified_at: transaction.verified_at.map(|at| at.to_string()),
            failed_at: transaction.failed_at.map(|at| at.to_string()),
        }
    }
}

/// Payment Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusResponse {
    pub success: bool,
    pub transaction: TransactionResponse,
    pub order: OrderResponse,
}

/// Payment Status Handler
#[endpoint(
    tags("payments"),
    summary = "Look up a payment by transaction uuid",
    responses(
        (status_code = StatusCode::OK, description = "Transaction found"),
        (status_code = StatusCode::NOT_FOUND, description = "Transaction not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    transaction_uuid: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<StatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let (transaction, order) = state
        .app
        .ledger
        .transaction_with_order(&transaction_uuid.into_inner())
        .await
        .ok_or_else(|| StatusError::not_found().brief("Transaction not found"))?;

    Ok(Json(StatusResponse {
        success: true,
        transaction: transaction.into(),
        order: order.into(),
    }))
}
