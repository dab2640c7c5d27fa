//! Checkout errors.

use foundry::orders::ValidationErrors;
use thiserror::Error;

use crate::domain::orders::OrdersServiceError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),
}
