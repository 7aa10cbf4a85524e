//! Gateway-facing identifier generation.
//!
//! eSewa only accepts alphanumeric characters and hyphens in transaction
//! identifiers, so these are formatted strings rather than raw UUIDs.

use jiff::Timestamp;
use uuid::Uuid;

const ORDER_ID_PREFIX: &str = "ORD";
const TRANSACTION_PREFIX: &str = "PASAL";
const REF_ID_PREFIX: &str = "REF";

#[must_use]
pub(crate) fn new_order_id() -> String {
    format!("{ORDER_ID_PREFIX}{}", random_hex(8))
}

/// Format: `PASAL-<yymmdd>-<6 hex chars>`.
#[must_use]
pub(crate) fn new_transaction_uuid() -> String {
    let date = Timestamp::now().strftime("%y%m%d");
    format!("{TRANSACTION_PREFIX}-{date}-{}", random_hex(6))
}

/// Simulated gateway reference id for the status probe.
#[must_use]
pub(crate) fn new_ref_id() -> String {
    format!("{REF_ID_PREFIX}{}", random_hex(6))
}

fn random_hex(len: usize) -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(len)
        .collect::<String>()
        .to_uppercase()
}
