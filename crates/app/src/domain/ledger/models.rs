//! Ledger Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::DeliverySpeed;

/// A single cart line item as submitted at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    pub price: Decimal,

    /// Unit count; storefronts send either `qty` or `quantity`.
    #[serde(default = "default_qty", alias = "quantity")]
    pub qty: u32,
}

fn default_qty() -> u32 {
    1
}

/// Delivery destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLocation {
    pub district: String,

    #[serde(default)]
    pub area: Option<String>,
}

/// Order lifecycle. `Paid` and `PaymentFailed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    PaymentFailed,
}

/// Transaction lifecycle. `Success` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    /// Terminal transactions never change status again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Money breakdown computed at checkout.
///
/// `total_amount = amount (post-discount) + tax + service charge +
/// delivery charge`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Base product amount after the discount was applied.
    pub amount: Decimal,
    pub tax_amount: Decimal,
    pub product_service_charge: Decimal,
    pub product_delivery_charge: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
}

/// Order Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub transaction_uuid: String,
    pub cart: Vec<CartItem>,
    pub location: DeliveryLocation,
    pub delivery_speed: DeliverySpeed,

    #[serde(flatten)]
    pub totals: OrderTotals,

    pub promo_code: Option<String>,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub transaction_code: Option<String>,
    pub payment_verified_at: Option<Timestamp>,
}

/// Transaction Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Gateway-facing identifier, unique and immutable once assigned.
    pub transaction_uuid: String,

    /// The owning order; always references an existing order.
    pub order_id: String,

    pub total_amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    pub transaction_code: Option<String>,
    pub verified_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
}
