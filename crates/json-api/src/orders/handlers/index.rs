//! List Orders Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use pasal_app::domain::{
    ledger::models::{CartItem, DeliveryLocation, Order, OrderStatus},
    pricing::DeliverySpeed,
};

use crate::{extensions::*, state::State};

/// Cart line item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub id: u64,
    pub name: String,
    pub price: String,
    pub qty: u32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price.normalize().to_string(),
            qty: item.qty,
        }
    }
}

/// Delivery destination
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocationResponse {
    pub district: String,
    pub area: Option<String>,
}

impl From<DeliveryLocation> for LocationResponse {
    fn from(location: DeliveryLocation) -> Self {
        Self {
            district: location.district,
            area: location.area,
        }
    }
}

fn order_status_label(status: OrderStatus) -> String {
    match status {
        OrderStatus::Pending => "PENDING",
        OrderStatus::Paid => "PAID",
        OrderStatus::PaymentFailed => "PAYMENT_FAILED",
    }
    .to_owned()
}

fn speed_label(speed: DeliverySpeed) -> String {
    match speed {
        DeliverySpeed::Standard => "standard",
        DeliverySpeed::Express => "express",
        DeliverySpeed::Scheduled => "scheduled",
    }
    .to_owned()
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// Internal order id
    pub id: String,

    /// Gateway transaction uuid
    pub transaction_uuid: String,

    pub cart: Vec<CartItemResponse>,

    pub location: LocationResponse,

    pub delivery_speed: String,

    /// Base product amount after discount
    pub amount: String,

    pub tax_amount: String,

    pub product_service_charge: String,

    pub product_delivery_charge: String,

    pub discount: String,

    pub total_amount: String,

    pub promo_code: Option<String>,

    /// PENDING, PAID or PAYMENT_FAILED
    pub status: String,

    pub created_at: String,

    /// Gateway reference code, set on success
    pub transaction_code: Option<String>,

    pub payment_verified_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            transaction_uuid: order.transaction_uuid,
            cart: order.cart.into_iter().map(CartItemResponse::from).collect(),
            location: order.location.into(),
            delivery_speed: speed_label(order.delivery_speed),
            amount: order.totals.amount.normalize().to_string(),
            tax_amount: order.totals.tax_amount.normalize().to_string(),
            product_service_charge: order.totals.product_service_charge.normalize().to_string(),
            product_delivery_charge: order
                .totals
                .product_delivery_charge
                .normalize()
                .to_string(),
            discount: order.totals.discount.normalize().to_string(),
            total_amount: order.totals.total_amount.normalize().to_string(),
            promo_code: order.promo_code,
            status: order_status_label(order.status),
            created_at: order.created_at.to_string(),
            transaction_code: order.transaction_code,
            payment_verified_at: order.payment_verified_at.map(|at| at.to_string()),
        }
    }
}

/// Orders List Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub success: bool,

    /// Orders in creation order
    pub orders: Vec<OrderResponse>,

    pub count: usize,
}

/// List Orders Handler
#[endpoint(
    tags("orders"),
    summary = "List all orders in creation order",
    responses(
        (status_code = StatusCode::OK, description = "Orders listed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders: Vec<OrderResponse> = state
        .app
        .ledger
        .orders()
        .await
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    let count = orders.len();

    Ok(Json(OrdersResponse {
        success: true,
        orders,
        count,
    }))
}
