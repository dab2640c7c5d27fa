//! Stripe Webhook Handler

use foundry_app::domain::orders::models::PaymentOutcome;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{extensions::*, orders::errors::into_status_error};

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Webhook Acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// What happened to the event (applied, duplicate, ignored)
    pub outcome: String,
}

impl WebhookResponse {
    fn new(outcome: &str) -> Json<Self> {
        Json(Self {
            outcome: outcome.to_string(),
        })
    }
}

/// Stripe Webhook Handler
///
/// Verifies the signature, then applies checkout session events to the
/// referenced order. Redelivered events are acknowledged without effect.
#[endpoint(
    tags("webhooks"),
    summary = "Stripe Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event acknowledged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or payload"),
        (status_code = StatusCode::NOT_FOUND, description = "Referenced order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.state()?;
    let signature = req.header::<String>(SIGNATURE_HEADER).unwrap_or_default();
    let payload = req
        .payload()
        .await
        .or_400("Could not read webhook payload")?;

    let event = match state.app.webhooks.verify(payload, &signature) {
        Ok(Some(event)) => event,
        Ok(None) => return Ok(WebhookResponse::new("ignored")),
        Err(error) => {
            warn!(%error, "rejected webhook delivery");

            return Err(StatusError::bad_request().brief("Invalid webhook signature or payload"));
        }
    };

    let event_id = event.event_id.clone();

    let outcome = state
        .app
        .checkout
        .confirm_payment(event)
        .await
        .map_err(into_status_error)?;

    let outcome = match outcome {
        PaymentOutcome::Applied { order, previous } => {
            info!(
                event = %event_id,
                order = %order.id,
                %previous,
                status = %order.status,
                "applied payment event"
            );

            "applied"
        }
        PaymentOutcome::Duplicate => {
            info!(event = %event_id, "payment event already processed");

            "duplicate"
        }
        PaymentOutcome::Ignored { order } => {
            info!(
                event = %event_id,
                order = %order.id,
                status = %order.status,
                "payment event does not apply"
            );

            "ignored"
        }
    };

    Ok(WebhookResponse::new(outcome))
}

#[cfg(test)]
mod tests {
    use foundry::orders::{OrderId, OrderStatus, PaymentEvent};
    use foundry_app::domain::{checkout::MockCheckoutService, orders::OrdersServiceError};
    use hmac::{Hmac, Mac};
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use sha2::Sha256;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_WEBHOOK_SECRET, make_order};

    use super::*;

    fn make_service(checkout: MockCheckoutService) -> Service {
        Mocks {
            checkout,
            ..Mocks::default()
        }
        .service(Router::with_path("webhooks/stripe").post(handler))
    }

    fn completed_session() -> String {
        json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_1",
                    "payment_intent": "pi_1",
                    "metadata": { "orderId": "ord-1" }
                }
            }
        })
        .to_string()
    }

    fn sign(secret: &str, payload: &str) -> TestResult<String> {
        let timestamp = Timestamp::now().as_second();
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret.as_bytes())
            .map_err(|error| error.to_string())?;

        mac.update(format!("{timestamp}.{payload}").as_bytes());

        Ok(format!(
            "t={timestamp},v1={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    async fn deliver(checkout: MockCheckoutService, payload: String, signature: &str) -> Response {
        TestClient::post("http://example.com/webhooks/stripe")
            .add_header(SIGNATURE_HEADER, signature, true)
            .raw_json(payload)
            .send(&make_service(checkout))
            .await
    }

    #[tokio::test]
    async fn test_signed_completion_is_applied() -> TestResult {
        let payload = completed_session();
        let signature = sign(TEST_WEBHOOK_SECRET, &payload)?;
        let paid = make_order("ord-1", OrderStatus::Paid)?;

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_confirm_payment()
            .once()
            .withf(|event| {
                *event
                    == PaymentEvent {
                        event_id: "evt_1".to_string(),
                        order_id: OrderId::new("ord-1"),
                        status: OrderStatus::Paid,
                        session_id: Some("cs_1".to_string()),
                        payment_intent_id: Some("pi_1".to_string()),
                    }
            })
            .return_once(move |_| {
                Ok(PaymentOutcome::Applied {
                    order: paid,
                    previous: OrderStatus::Pending,
                })
            });

        let mut res = deliver(checkout, payload, &signature).await;
        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "applied");

        Ok(())
    }

    #[tokio::test]
    async fn test_redelivery_is_acknowledged() -> TestResult {
        let payload = completed_session();
        let signature = sign(TEST_WEBHOOK_SECRET, &payload)?;

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_confirm_payment()
            .once()
            .return_once(|_| Ok(PaymentOutcome::Duplicate));

        let mut res = deliver(checkout, payload, &signature).await;
        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "duplicate");

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_signature_returns_400() -> TestResult {
        let payload = completed_session();
        let signature = sign("whsec_other", &payload)?;

        let mut checkout = MockCheckoutService::new();

        checkout.expect_confirm_payment().never();

        let res = deliver(checkout, payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unrelated_event_is_ignored() -> TestResult {
        let payload = json!({
            "id": "evt_2",
            "type": "customer.created",
            "data": { "object": { "id": "cus_1" } }
        })
        .to_string();
        let signature = sign(TEST_WEBHOOK_SECRET, &payload)?;

        let mut checkout = MockCheckoutService::new();

        checkout.expect_confirm_payment().never();

        let mut res = deliver(checkout, payload, &signature).await;
        let body: WebhookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "ignored");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_order_returns_404() -> TestResult {
        let payload = completed_session();
        let signature = sign(TEST_WEBHOOK_SECRET, &payload)?;

        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_confirm_payment()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = deliver(checkout, payload, &signature).await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
