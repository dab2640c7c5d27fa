//! Errors

use foundry::orders::ValidationErrors;
use salvo::http::StatusError;
use tracing::error;

use foundry_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(errors) => validation_error(&errors),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidReference | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Bad request listing every failing field as JSON in the detail.
pub(crate) fn validation_error(errors: &ValidationErrors) -> StatusError {
    StatusError::bad_request()
        .brief("Invalid order payload")
        .detail(
            serde_json::to_string(errors).unwrap_or_else(|_unserializable| errors.to_string()),
        )
}
