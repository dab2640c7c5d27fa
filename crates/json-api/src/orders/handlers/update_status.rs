//! Update Order Status Handler

use foundry::orders::{OrderId, OrderStatus};
use foundry_app::domain::orders::models::StatusUpdate;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateStatusRequest {
    /// New status (pending, paid, failed)
    pub status: String,

    /// Checkout session reference to attach
    #[serde(default)]
    pub session_id: Option<String>,

    /// Payment intent reference to attach
    #[serde(default)]
    pub payment_intent_id: Option<String>,
}

impl TryFrom<UpdateStatusRequest> for StatusUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        Ok(StatusUpdate {
            status: request
                .status
                .parse::<OrderStatus>()
                .or_400("Unknown order status")?,
            session_id: request.session_id,
            payment_intent_id: request.payment_intent_id,
        })
    }
}

/// Update Order Status Handler
///
/// Operator override; the last write wins.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(name = "orders.update_status", skip_all, err)]
pub(crate) async fn handler(
    order: PathParam<String>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.state()?;
    let update = StatusUpdate::try_from(json.into_inner())?;
    let status = update.status;

    let order = state
        .app
        .orders
        .update_status(OrderId::from(order.into_inner()), update)
        .await
        .map_err(into_status_error)?;

    tracing::info!(order = %order.id, %status, "updated order status");

    Ok(Json(
        OrderResponse::new(order, &state.currency).or_500("failed to format order total")?,
    ))
}
