//! Errors

use salvo::http::StatusError;

use foundry_app::domain::checkout::CheckoutError;

use crate::orders::errors::{into_status_error as orders_status_error, validation_error};

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        CheckoutError::Validation(errors) => validation_error(&errors),
        CheckoutError::Orders(error) => orders_status_error(error),
    }
}
