//! Initiate Payment Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use pasal_app::domain::{
    checkout::models::{CheckoutRequest, EsewaFormData, LocationInput},
    ledger::models::CartItem,
    pricing::DeliverySpeed,
};

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Initiate Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitiateRequest {
    /// Cart line items
    #[serde(default)]
    pub cart: Vec<CartItemRequest>,

    /// Delivery destination
    #[serde(default)]
    pub location: Option<LocationRequest>,

    /// Delivery speed: standard, express or scheduled
    #[serde(default)]
    pub delivery_speed: Option<String>,

    /// Optional promo code
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Cart line item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemRequest {
    pub id: u64,
    pub name: String,
    pub price: f64,

    /// Unit count; `quantity` is accepted as an alias
    #[serde(default = "default_qty", alias = "quantity")]
    pub qty: u32,
}

fn default_qty() -> u32 {
    1
}

/// Delivery destination
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationRequest {
    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub area: Option<String>,
}

/// eSewa ePay v2 form fields, exactly as signed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EsewaDataResponse {
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

impl From<EsewaFormData> for EsewaDataResponse {
    fn from(data: EsewaFormData) -> Self {
        Self {
            amount: data.amount,
            tax_amount: data.tax_amount,
            total_amount: data.total_amount,
            transaction_uuid: data.transaction_uuid,
            product_code: data.product_code,
            product_service_charge: data.product_service_charge,
            product_delivery_charge: data.product_delivery_charge,
            success_url: data.success_url,
            failure_url: data.failure_url,
            signed_field_names: data.signed_field_names,
            signature: data.signature,
        }
    }
}

/// Payment Initiated Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InitiateResponse {
    pub success: bool,

    /// Internal order id
    pub order_id: String,

    /// Gateway transaction uuid
    pub transaction_uuid: String,

    /// eSewa form endpoint to POST `esewa_data` to
    pub payment_url: String,

    pub esewa_data: EsewaDataResponse,

    pub message: String,
}

fn parse_speed(speed: Option<&str>) -> DeliverySpeed {
    // Unrecognized speeds fall back to standard rather than erroring.
    match speed.map(str::to_lowercase).as_deref() {
        Some("express") => DeliverySpeed::Express,
        Some("scheduled") => DeliverySpeed::Scheduled,
        _ => DeliverySpeed::Standard,
    }
}

fn to_checkout_request(request: InitiateRequest) -> Result<CheckoutRequest, StatusError> {
    let mut cart = Vec::with_capacity(request.cart.len());

    for item in request.cart {
        let price = Decimal::from_f64_retain(item.price)
            .ok_or_else(|| StatusError::bad_request().brief("Invalid cart item"))?;

        cart.push(CartItem {
            id: item.id,
            name: item.name,
            price,
            qty: item.qty,
        });
    }

    Ok(CheckoutRequest {
        cart,
        location: request.location.map(|location| LocationInput {
            district: location.district,
            area: location.area,
        }),
        delivery_speed: parse_speed(request.delivery_speed.as_deref()),
        promo_code: request.promo_code,
    })
}

/// Initiate Payment Handler
#[endpoint(
    tags("payments"),
    summary = "Initiate an eSewa payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment initiated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid checkout payload"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<InitiateRequest>,
    depot: &mut Depot,
) -> Result<Json<InitiateResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = to_checkout_request(json.into_inner())?;

    let initiation = state
        .app
        .checkout
        .initiate(request)
        .await
        .map_err(into_status_error)?;

    Ok(Json(InitiateResponse {
        success: true,
        order_id: initiation.order_id,
        transaction_uuid: initiation.transaction_uuid,
        payment_url: initiation.payment_url,
        esewa_data: initiation.esewa_data.into(),
        message: "Submit esewa_data to payment_url as a form POST".to_owned(),
    }))
}
