//! List User Orders Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
};

/// List User Orders Handler
///
/// Returns the user's paid orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Paid Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Paid orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.state()?;

    let orders = state
        .app
        .orders
        .list_paid_orders(user.into_inner())
        .await
        .map_err(into_status_error)?;

    let orders = orders
        .into_iter()
        .map(|order| OrderResponse::new(order, &state.currency))
        .collect::<Result<Vec<_>, _>>()
        .or_500("failed to format order totals")?;

    Ok(Json(orders))
}
