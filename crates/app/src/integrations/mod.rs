//! Collaborator adapters: transactional mail, mailing list and payment
//! provider webhooks.

pub mod mail;
pub mod mailing_list;
pub mod payments;

use thiserror::Error;

pub use mail::{HttpMailer, MailConfig, Mailer, MockMailer};
pub use mailing_list::{HttpMailingList, MailingList, MailingListConfig, MockMailingList};
pub use payments::{StripeWebhookVerifier, WebhookError};

/// Failure talking to an external collaborator.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed")]
    Http(#[from] reqwest::Error),

    #[error("unexpected upstream response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Turn a non-success response into an [`UpstreamError`].
async fn expect_success(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response, UpstreamError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    Err(UpstreamError::UnexpectedResponse(format!(
        "{operation} failed with status {status}: {text}"
    )))
}
