//! Subscribe Handler

use foundry::orders::EmailAddress;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, newsletter::errors::into_status_error};

/// Subscription Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SubscriptionRequest {
    /// Address to subscribe
    pub email: String,

    /// Optional tag, usually a studio name
    #[serde(default)]
    pub tag: Option<String>,
}

/// Subscribe Handler
#[endpoint(
    tags("newsletter"),
    summary = "Subscribe To Newsletter",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Subscribed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid email"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Mailing list unavailable"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SubscriptionRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;
    let request = json.into_inner();
    let email = EmailAddress::parse(request.email).or_400("Invalid email address")?;

    state
        .app
        .mailing_list
        .subscribe(email, request.tag.filter(|tag| !tag.trim().is_empty()))
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
