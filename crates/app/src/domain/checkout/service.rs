//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    domain::{
        checkout::{
            errors::CheckoutError,
            models::{CheckoutRequest, EsewaFormData, PaymentInitiation},
        },
        ledger::{
            LedgerService,
            models::{
                DeliveryLocation, Order, OrderStatus, OrderTotals, Transaction,
                TransactionStatus,
            },
        },
        pricing,
        signature::{OUTBOUND_SIGNED_FIELD_NAMES, Signer},
    },
    gateway::EsewaConfig,
    ids,
};

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validate a checkout request, record the PENDING order/transaction
    /// pair in the ledger, and build the signed eSewa redirect payload.
    async fn initiate(
        &self,
        request: CheckoutRequest,
    ) -> Result<PaymentInitiation, CheckoutError>;
}

/// Checkout backed by the shared ledger and the eSewa signer.
pub struct EsewaCheckout {
    config: EsewaConfig,
    signer: Signer,
    ledger: Arc<dyn LedgerService>,
}

impl EsewaCheckout {
    #[must_use]
    pub fn new(config: EsewaConfig, ledger: Arc<dyn LedgerService>) -> Self {
        let signer = Signer::new(config.secret_key.clone());

        Self {
            config,
            signer,
            ledger,
        }
    }
}

/// Render an amount the way it goes on the wire (no trailing zeros).
pub(crate) fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[async_trait]
impl CheckoutService for EsewaCheckout {
    async fn initiate(
        &self,
        request: CheckoutRequest,
    ) -> Result<PaymentInitiation, CheckoutError> {
        if request.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let district = request
            .location
            .as_ref()
            .and_then(|location| location.district.as_deref())
            .map(str::trim)
            .filter(|district| !district.is_empty())
            .ok_or(CheckoutError::MissingLocation)?
            .to_owned();

        let mut subtotal = Decimal::ZERO;

        for item in &request.cart {
            if item.price < Decimal::ZERO || item.qty == 0 {
                return Err(CheckoutError::InvalidCartItem);
            }

            subtotal += item.price * Decimal::from(item.qty);
        }

        let discount = pricing::discount(request.promo_code.as_deref(), subtotal);
        let amount = subtotal - discount;
        let tax_amount = Decimal::ZERO;
        let product_service_charge = Decimal::ZERO;
        let product_delivery_charge = pricing::delivery_charge(&district, request.delivery_speed);
        let total_amount = amount + tax_amount + product_service_charge + product_delivery_charge;

        if total_amount <= Decimal::ZERO {
            return Err(CheckoutError::InvalidTotal);
        }

        let order_id = ids::new_order_id();
        let transaction_uuid = ids::new_transaction_uuid();
        let total_amount_text = format_amount(total_amount);

        let signature = self.signer.sign(&[
            ("total_amount", total_amount_text.as_str()),
            ("transaction_uuid", transaction_uuid.as_str()),
            ("product_code", self.config.merchant_code.as_str()),
        ]);

        let now = Timestamp::now();

        let order = Order {
            id: order_id.clone(),
            transaction_uuid: transaction_uuid.clone(),
            cart: request.cart,
            location: DeliveryLocation {
                district,
                area: request.location.and_then(|location| location.area),
            },
            delivery_speed: request.delivery_speed,
            totals: OrderTotals {
                amount,
                tax_amount,
                product_service_charge,
                product_delivery_charge,
                discount,
                total_amount,
            },
            promo_code: request.promo_code,
            status: OrderStatus::Pending,
            created_at: now,
            transaction_code: None,
            payment_verified_at: None,
        };

        let transaction = Transaction {
            transaction_uuid: transaction_uuid.clone(),
            order_id: order_id.clone(),
            total_amount,
            status: TransactionStatus::Pending,
            created_at: now,
            transaction_code: None,
            verified_at: None,
            failed_at: None,
        };

        self.ledger.record(order, transaction).await;

        info!(order_id, transaction_uuid, %total_amount, "payment initiated");

        Ok(PaymentInitiation {
            order_id,
            transaction_uuid: transaction_uuid.clone(),
            payment_url: self.config.payment_url.clone(),
            esewa_data: EsewaFormData {
                amount: format_amount(amount),
                tax_amount: format_amount(tax_amount),
                total_amount: total_amount_text,
                transaction_uuid,
                product_code: self.config.merchant_code.clone(),
                product_service_charge: format_amount(product_service_charge),
                product_delivery_charge: format_amount(product_delivery_charge),
                success_url: self.config.urls.success_url.clone(),
                failure_url: self.config.urls.failure_url.clone(),
                signed_field_names: OUTBOUND_SIGNED_FIELD_NAMES.to_owned(),
                signature,
            },
        })
    }
}
