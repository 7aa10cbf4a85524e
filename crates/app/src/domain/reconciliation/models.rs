//! Reconciliation Models

use serde::{Deserialize, Serialize};

/// Decoded eSewa success-callback payload.
///
/// Every field is optional at the wire level; required-field policy lives
/// in the reconciliation service so a sparse payload turns into a redirect
/// reason instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackPayload {
    #[serde(default)]
    pub transaction_code: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub total_amount: Option<String>,

    #[serde(default)]
    pub transaction_uuid: Option<String>,

    #[serde(default)]
    pub product_code: Option<String>,

    #[serde(default)]
    pub signed_field_names: Option<String>,

    #[serde(default)]
    pub signature: Option<String>,
}

impl CallbackPayload {
    /// Value of a signed field by its wire name. The `signature` field is
    /// never part of the signed set.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "transaction_code" => self.transaction_code.as_deref(),
            "status" => self.status.as_deref(),
            "total_amount" => self.total_amount.as_deref(),
            "transaction_uuid" => self.transaction_uuid.as_deref(),
            "product_code" => self.product_code.as_deref(),
            "signed_field_names" => self.signed_field_names.as_deref(),
            _ => None,
        }
    }
}

/// Machine-readable reason carried to the failure page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    MissingData,
    InvalidResponse,
    MissingParams,
    InvalidSignature,
    UnknownTransaction,
    PaymentIncomplete,
    SystemError,
}

impl FailureReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingData => "missing_data",
            Self::InvalidResponse => "invalid_response",
            Self::MissingParams => "missing_params",
            Self::InvalidSignature => "invalid_signature",
            Self::UnknownTransaction => "unknown_transaction",
            Self::PaymentIncomplete => "payment_incomplete",
            Self::SystemError => "system_error",
        }
    }
}

/// Where to send the shopper after a gateway callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Redirect to the success page with order details.
    Success {
        order_id: String,
        transaction_code: String,
    },

    /// Redirect to the failure page, optionally with a reason code.
    Failure { reason: Option<FailureReason> },
}

impl CallbackOutcome {
    #[must_use]
    pub const fn failure(reason: FailureReason) -> Self {
        Self::Failure {
            reason: Some(reason),
        }
    }
}

/// Simulated eSewa transaction-status probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayStatus {
    pub product_code: String,
    pub transaction_uuid: String,
    pub total_amount: String,
    pub status: GatewayStatusKind,
    pub ref_id: Option<String>,
}

/// Status values the eSewa status API reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayStatusKind {
    Complete,
    Pending,
    Failed,
    NotFound,
}
