//! Delivery-charge and promo-discount tables.
//!
//! Pure lookups, no side effects. Cart validation happens in checkout, so
//! inputs here are assumed non-negative.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Delivery speed tiers offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverySpeed {
    #[default]
    Standard,
    Express,
    Scheduled,
}

const FALLBACK_BASE_CHARGE: Decimal = dec!(50);
const EXPRESS_SURCHARGE: Decimal = dec!(40);
const SCHEDULED_DISCOUNT: Decimal = dec!(10);

fn base_charge(district: &str) -> Decimal {
    match district.to_lowercase().as_str() {
        "kathmandu" => dec!(40),
        "lalitpur" => dec!(60),
        "bhaktapur" => dec!(80),
        "custom" => dec!(120),
        _ => FALLBACK_BASE_CHARGE,
    }
}

/// Delivery charge for a district and speed tier, floored at zero.
///
/// Unknown districts fall back to a flat base charge.
#[must_use]
pub fn delivery_charge(district: &str, speed: DeliverySpeed) -> Decimal {
    let charge = match speed {
        DeliverySpeed::Express => base_charge(district) + EXPRESS_SURCHARGE,
        DeliverySpeed::Scheduled => base_charge(district) - SCHEDULED_DISCOUNT,
        DeliverySpeed::Standard => base_charge(district),
    };

    charge.max(Decimal::ZERO)
}

/// Discount for a promo code applied to the cart subtotal.
///
/// Unknown or absent codes yield zero. Matching is case-insensitive.
#[must_use]
pub fn discount(promo_code: Option<&str>, subtotal: Decimal) -> Decimal {
    let Some(code) = promo_code else {
        return Decimal::ZERO;
    };

    match code.trim().to_uppercase().as_str() {
        "THAPA10" => subtotal * dec!(0.10),
        "FLAT50" => dec!(50),
        "NEWUSER20" => subtotal * dec!(0.20),
        _ => Decimal::ZERO,
    }
}
