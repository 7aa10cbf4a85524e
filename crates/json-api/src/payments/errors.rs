//! Errors

use salvo::http::StatusError;

use pasal_app::domain::checkout::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart
        | CheckoutError::MissingLocation
        | CheckoutError::InvalidCartItem
        | CheckoutError::InvalidTotal => StatusError::bad_request().brief(error.to_string()),
    }
}
