//! Checkout errors.
//!
//! The display strings double as the machine-readable briefs returned on
//! 400 responses, so they are part of the API contract.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Delivery location required")]
    MissingLocation,

    #[error("Invalid cart item")]
    InvalidCartItem,

    #[error("Invalid total amount")]
    InvalidTotal,
}
