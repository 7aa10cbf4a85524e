//! Checkout Models

use serde::{Deserialize, Serialize};

use crate::domain::{ledger::models::CartItem, pricing::DeliverySpeed};

/// Checkout request as accepted from the storefront. Everything optional
/// here is validated by the checkout service, not by deserialization, so
/// the API can answer with its own briefs instead of serde errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Vec<CartItem>,

    #[serde(default)]
    pub location: Option<LocationInput>,

    #[serde(default)]
    pub delivery_speed: DeliverySpeed,

    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Raw delivery location as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub area: Option<String>,
}

/// Everything the storefront needs to redirect the shopper to eSewa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentInitiation {
    pub order_id: String,
    pub transaction_uuid: String,
    pub payment_url: String,
    pub esewa_data: EsewaFormData,
}

/// eSewa ePay v2 form fields.
///
/// All amounts are the exact strings that were signed; re-rendering them
/// from numbers would risk a signature mismatch at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsewaFormData {
    pub amount: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub transaction_uuid: String,
    pub product_code: String,
    pub product_service_charge: String,
    pub product_delivery_charge: String,
    pub success_url: String,
    pub failure_url: String,
    pub signed_field_names: String,
    pub signature: String,
}
