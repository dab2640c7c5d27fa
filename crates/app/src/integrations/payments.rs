//! Stripe webhook verification.

use std::fmt;

use foundry::orders::{OrderId, OrderStatus, PaymentEvent};
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Default accepted age of a signed payload, in seconds.
pub const DEFAULT_TOLERANCE_SECONDS: i64 = 300;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("signature header has no timestamp")]
    MissingTimestamp,

    #[error("signature header has no v1 signature")]
    MissingSignature,

    #[error("signature timestamp is not a number")]
    InvalidTimestamp,

    #[error("signature verification failed")]
    SignatureMismatch,

    #[error("signature timestamp outside tolerance")]
    Expired,

    #[error("webhook payload could not be parsed")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("checkout session has no order reference")]
    MissingOrderReference,

    #[error("webhook secret cannot be used as an hmac key")]
    InvalidSecret,
}

/// Checks `Stripe-Signature` headers and maps checkout events to payment events.
#[derive(Clone)]
pub struct StripeWebhookVerifier {
    secret: Zeroizing<String>,
    tolerance_seconds: i64,
}

impl fmt::Debug for StripeWebhookVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeWebhookVerifier")
            .field("secret", &"**redacted**")
            .field("tolerance_seconds", &self.tolerance_seconds)
            .finish()
    }
}

impl StripeWebhookVerifier {
    #[must_use]
    pub fn new(secret: impl Into<String>, tolerance_seconds: i64) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            tolerance_seconds,
        }
    }

    /// Verify and parse a webhook delivery against the current time.
    ///
    /// Returns `Ok(None)` for verified events that do not concern an order.
    ///
    /// # Errors
    ///
    /// Returns a [`WebhookError`] if the signature is missing, wrong or stale, or
    /// if the payload is malformed.
    pub fn verify(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<Option<PaymentEvent>, WebhookError> {
        self.verify_at(payload, signature, Timestamp::now())
    }

    /// Like [`Self::verify`], with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`Self::verify`].
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature: &str,
        now: Timestamp,
    ) -> Result<Option<PaymentEvent>, WebhookError> {
        self.verify_signature(payload, signature, now)?;

        let event: RawEvent = serde_json::from_slice(payload)?;

        let status = match event.event_type.as_str() {
            "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
                OrderStatus::Paid
            }
            "checkout.session.async_payment_failed" | "checkout.session.expired" => {
                OrderStatus::Failed
            }
            other => {
                debug!(event = %event.id, event_type = other, "ignoring webhook event");

                return Ok(None);
            }
        };

        let session: RawCheckoutSession = serde_json::from_value(event.data.object)?;

        let order_id = session
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.get("orderId"))
            .and_then(Value::as_str)
            .or(session.client_reference_id.as_deref())
            .filter(|id| !id.is_empty())
            .ok_or(WebhookError::MissingOrderReference)?;

        Ok(Some(PaymentEvent {
            event_id: event.id,
            order_id: OrderId::new(order_id),
            status,
            session_id: Some(session.id),
            payment_intent_id: session.payment_intent.as_ref().and_then(reference_id),
        }))
    }

    fn verify_signature(
        &self,
        payload: &[u8],
        header: &str,
        now: Timestamp,
    ) -> Result<(), WebhookError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(WebhookError::MissingTimestamp)?;

        if signatures.is_empty() {
            return Err(WebhookError::MissingSignature);
        }

        let signed_at: i64 = timestamp
            .parse()
            .map_err(|_parse| WebhookError::InvalidTimestamp)?;

        let mac = self.mac(timestamp, payload)?;

        let matched = signatures
            .iter()
            .filter_map(|signature| hex::decode(signature).ok())
            .any(|signature| mac.clone().verify_slice(&signature).is_ok());

        if !matched {
            warn!("webhook signature verification failed");

            return Err(WebhookError::SignatureMismatch);
        }

        if now.as_second().abs_diff(signed_at) > self.tolerance_seconds.unsigned_abs() {
            warn!(signed_at, now = now.as_second(), "webhook timestamp outside tolerance");

            return Err(WebhookError::Expired);
        }

        Ok(())
    }

    fn mac(&self, timestamp: &str, payload: &[u8]) -> Result<Hmac<Sha256>, WebhookError> {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(self.secret.as_bytes())
            .map_err(|_invalid| WebhookError::InvalidSecret)?;

        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        Ok(mac)
    }
}

/// Stripe references are ids, or objects with an `id` when expanded.
fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(object) => object.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: Value,
}

#[derive(Debug, Deserialize)]
struct RawCheckoutSession {
    id: String,
    client_reference_id: Option<String>,
    payment_intent: Option<Value>,
    metadata: Option<serde_json::Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "whsec_test";
    const SIGNED_AT: i64 = 1_700_000_000;

    fn sign(secret: &str, timestamp: i64, payload: &str) -> TestResult<String> {
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret.as_bytes())
            .map_err(|error| error.to_string())?;

        mac.update(format!("{timestamp}.{payload}").as_bytes());

        Ok(format!(
            "t={timestamp},v1={}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    fn payload(event_type: &str) -> String {
        json!({
            "id": "evt_1",
            "type": event_type,
            "data": {
                "object": {
                    "id": "cs_test_1",
                    "client_reference_id": "ord-fallback",
                    "payment_intent": "pi_test_1",
                    "metadata": { "orderId": "ord-1" }
                }
            }
        })
        .to_string()
    }

    fn verifier() -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(SECRET, DEFAULT_TOLERANCE_SECONDS)
    }

    fn at(seconds: i64) -> TestResult<Timestamp> {
        Ok(Timestamp::from_second(seconds)?)
    }

    #[test]
    fn completed_session_maps_to_paid() -> TestResult {
        let body = payload("checkout.session.completed");
        let header = sign(SECRET, SIGNED_AT, &body)?;

        let event = verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT + 10)?)?;

        assert_eq!(
            event,
            Some(PaymentEvent {
                event_id: "evt_1".to_string(),
                order_id: OrderId::new("ord-1"),
                status: OrderStatus::Paid,
                session_id: Some("cs_test_1".to_string()),
                payment_intent_id: Some("pi_test_1".to_string()),
            })
        );

        Ok(())
    }

    #[test]
    fn failed_and_expired_sessions_map_to_failed() -> TestResult {
        for event_type in [
            "checkout.session.async_payment_failed",
            "checkout.session.expired",
        ] {
            let body = payload(event_type);
            let header = sign(SECRET, SIGNED_AT, &body)?;

            let event = verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT)?)?;

            assert_eq!(event.map(|e| e.status), Some(OrderStatus::Failed));
        }

        Ok(())
    }

    #[test]
    fn client_reference_is_used_without_metadata() -> TestResult {
        let body = json!({
            "id": "evt_2",
            "type": "checkout.session.async_payment_succeeded",
            "data": { "object": { "id": "cs_2", "client_reference_id": "ord-2" } }
        })
        .to_string();
        let header = sign(SECRET, SIGNED_AT, &body)?;

        let event = verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT)?)?;

        assert_eq!(event.map(|e| e.order_id), Some(OrderId::new("ord-2")));

        Ok(())
    }

    #[test]
    fn unrelated_events_are_ignored() -> TestResult {
        let body = json!({
            "id": "evt_3",
            "type": "customer.created",
            "data": { "object": { "id": "cus_1" } }
        })
        .to_string();
        let header = sign(SECRET, SIGNED_AT, &body)?;

        assert_eq!(
            verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT)?)?,
            None
        );

        Ok(())
    }

    #[test]
    fn tampered_payload_fails() -> TestResult {
        let body = payload("checkout.session.completed");
        let header = sign(SECRET, SIGNED_AT, &body)?;
        let tampered = body.replace("ord-1", "ord-9");

        let result = verifier().verify_at(tampered.as_bytes(), &header, at(SIGNED_AT)?);

        assert!(matches!(result, Err(WebhookError::SignatureMismatch)));

        Ok(())
    }

    #[test]
    fn wrong_secret_fails() -> TestResult {
        let body = payload("checkout.session.completed");
        let header = sign("whsec_other", SIGNED_AT, &body)?;

        let result = verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT)?);

        assert!(matches!(result, Err(WebhookError::SignatureMismatch)));

        Ok(())
    }

    #[test]
    fn stale_timestamp_fails() -> TestResult {
        let body = payload("checkout.session.completed");
        let header = sign(SECRET, SIGNED_AT, &body)?;

        let result = verifier().verify_at(
            body.as_bytes(),
            &header,
            at(SIGNED_AT + DEFAULT_TOLERANCE_SECONDS + 1)?,
        );

        assert!(matches!(result, Err(WebhookError::Expired)));

        Ok(())
    }

    #[test]
    fn missing_parts_are_reported() {
        let verifier = verifier();

        assert!(matches!(
            verifier.verify(b"{}", "v1=abc"),
            Err(WebhookError::MissingTimestamp)
        ));
        assert!(matches!(
            verifier.verify(b"{}", "t=123"),
            Err(WebhookError::MissingSignature)
        ));
    }

    #[test]
    fn session_without_order_reference_is_rejected() -> TestResult {
        let body = json!({
            "id": "evt_4",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_4" } }
        })
        .to_string();
        let header = sign(SECRET, SIGNED_AT, &body)?;

        let result = verifier().verify_at(body.as_bytes(), &header, at(SIGNED_AT)?);

        assert!(matches!(result, Err(WebhookError::MissingOrderReference)));

        Ok(())
    }
}
