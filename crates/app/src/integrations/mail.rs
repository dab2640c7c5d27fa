//! Transactional mail.

use std::fmt;

use async_trait::async_trait;
use foundry::orders::{DownloadToken, EmailAddress, OrderId};
use mockall::automock;
use reqwest::{Client, Url};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::integrations::{UpstreamError, expect_success};

/// Mail provider settings.
#[derive(Clone)]
pub struct MailConfig {
    /// Endpoint accepting a JSON message, e.g. `https://api.mail.example/emails`
    pub api_url: String,

    /// Bearer API key
    pub api_key: Zeroizing<String>,

    /// Sender address
    pub from: String,

    /// Public site origin used to build download links
    pub public_base_url: String,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"**redacted**")
            .field("from", &self.from)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

/// Build `{base}/order/{order}?token={token}`.
///
/// # Errors
///
/// Returns an error if `base` is not an absolute URL that can carry a path.
pub fn download_link(
    base: &str,
    order: &OrderId,
    token: &DownloadToken,
) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base)
        .map_err(|error| UpstreamError::InvalidUrl(format!("{base}: {error}")))?;

    url.path_segments_mut()
        .map_err(|()| UpstreamError::InvalidUrl(format!("{base} cannot be a base url")))?
        .pop_if_empty()
        .push("order")
        .push(order.as_str());

    url.query_pairs_mut().append_pair("token", token.as_str());

    Ok(url)
}

#[derive(Debug, Clone)]
pub struct HttpMailer {
    config: MailConfig,
    http: Client,
}

impl HttpMailer {
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: String,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_download_link(
        &self,
        email: EmailAddress,
        order: OrderId,
        token: DownloadToken,
    ) -> Result<(), UpstreamError> {
        let link = download_link(&self.config.public_base_url, &order, &token)?;

        let message = MailMessage {
            from: &self.config.from,
            to: [email.as_str()],
            subject: "Your fonts are ready to download",
            text: format!(
                "Thank you for your purchase.\n\nDownload your fonts here: {link}\n\nOrder: {order}\n"
            ),
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(self.config.api_key.as_str())
            .json(&message)
            .send()
            .await?;

        expect_success(response, "send download link").await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the buyer a message containing the order's download link.
    async fn send_download_link(
        &self,
        email: EmailAddress,
        order: OrderId,
        token: DownloadToken,
    ) -> Result<(), UpstreamError>;
}
