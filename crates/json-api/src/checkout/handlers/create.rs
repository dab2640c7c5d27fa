//! Checkout Handler

use foundry::{orders::validate_selection, pricing::format_minor};
use foundry_app::domain::checkout::models::CheckoutRequest;
use salvo::{http::header::LOCATION, oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    checkout::errors::into_status_error, extensions::*, orders::errors::validation_error,
};

/// Order Placed Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderPlacedResponse {
    /// Order identifier
    pub id: String,

    /// Total in minor currency units
    pub total_cents: u64,

    /// Total formatted for display
    pub formatted_total: String,

    /// Capability token for the download link
    pub download_token: String,
}

fn checkout_request(body: &Value) -> Result<CheckoutRequest, StatusError> {
    let selection = validate_selection(body).map_err(|errors| validation_error(&errors))?;

    Ok(CheckoutRequest {
        user_id: selection.user_id,
        email: String::from(selection.email),
        lines: selection.items,
        subscribe: selection.subscribe,
    })
}

/// Checkout Handler
///
/// Freezes the selection into a pending order. The body carries `userId`,
/// `email`, `items` and an optional `subscribe`; every failing field is
/// listed in the error detail.
#[endpoint(
    tags("checkout"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or empty cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "checkout.create",
    skip_all,
    fields(order = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderPlacedResponse>, StatusError> {
    let state = depot.state()?;

    let body = req
        .parse_json::<Value>()
        .await
        .or_400("Malformed JSON body")?;

    let order = state
        .app
        .checkout
        .place_order(checkout_request(&body)?)
        .await
        .map_err(into_status_error)?;

    tracing::Span::current().record("order", tracing::field::display(&order.id));

    let formatted_total =
        format_minor(order.total_cents, &state.currency).or_500("failed to format order total")?;

    res.add_header(
        LOCATION,
        format!("/order/{}?token={}", order.id, order.download_token.as_str()),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    tracing::info!(order = %order.id, total_cents = order.total_cents, "placed order");

    Ok(Json(OrderPlacedResponse {
        id: order.id.into_string(),
        total_cents: order.total_cents,
        formatted_total,
        download_token: order.download_token.into_string(),
    }))
}
