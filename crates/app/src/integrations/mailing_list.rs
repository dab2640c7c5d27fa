//! Mailing list.

use std::fmt;

use async_trait::async_trait;
use foundry::orders::EmailAddress;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::integrations::{UpstreamError, expect_success};

/// Mailing list provider settings.
#[derive(Clone)]
pub struct MailingListConfig {
    /// Provider API root
    pub api_url: String,

    /// Bearer API key
    pub api_key: Zeroizing<String>,

    /// Audience (list) identifier
    pub audience: String,
}

impl fmt::Debug for MailingListConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailingListConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"**redacted**")
            .field("audience", &self.audience)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpMailingList {
    config: MailingListConfig,
    http: Client,
}

impl HttpMailingList {
    #[must_use]
    pub fn new(config: MailingListConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/audiences/{}/{resource}",
            self.config.api_url.trim_end_matches('/'),
            self.config.audience
        )
    }

    async fn post<T: Serialize + Sync>(
        &self,
        resource: &str,
        body: &T,
        operation: &str,
    ) -> Result<(), UpstreamError> {
        let response = self
            .http
            .post(self.endpoint(resource))
            .bearer_auth(self.config.api_key.as_str())
            .json(body)
            .send()
            .await?;

        // Already subscribed or tag already present.
        if response.status() == StatusCode::CONFLICT {
            debug!(operation, "mailing list entry already exists");

            return Ok(());
        }

        expect_success(response, operation).await?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Subscription<'a> {
    email_address: &'a str,
    status: &'a str,
    tags: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct Tag<'a> {
    name: &'a str,
}

#[async_trait]
impl MailingList for HttpMailingList {
    async fn subscribe(
        &self,
        email: EmailAddress,
        tag: Option<String>,
    ) -> Result<(), UpstreamError> {
        let subscription = Subscription {
            email_address: email.as_str(),
            status: "subscribed",
            tags: tag.as_deref().into_iter().collect(),
        };

        self.post("members", &subscription, "subscribe").await
    }

    async fn ensure_tag(&self, studio_name: String) -> Result<(), UpstreamError> {
        self.post("tags", &Tag { name: &studio_name }, "ensure tag")
            .await
    }
}

#[automock]
#[async_trait]
pub trait MailingList: Send + Sync {
    /// Subscribe an address, optionally tagged. Repeating a call is harmless.
    async fn subscribe(&self, email: EmailAddress, tag: Option<String>)
    -> Result<(), UpstreamError>;

    /// Make sure a tag exists for a studio. Repeating a call is harmless.
    async fn ensure_tag(&self, studio_name: String) -> Result<(), UpstreamError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    fn list(server: &MockServer) -> HttpMailingList {
        HttpMailingList::new(MailingListConfig {
            api_url: server.uri(),
            api_key: Zeroizing::new("list-key".to_string()),
            audience: "aud-1".to_string(),
        })
    }

    #[tokio::test]
    async fn subscribe_posts_member_with_tag() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audiences/aud-1/members"))
            .and(header("authorization", "Bearer list-key"))
            .and(body_json(serde_json::json!({
                "email_address": "buyer@example.com",
                "status": "subscribed",
                "tags": ["north-type"],
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        list(&server)
            .subscribe(
                EmailAddress::parse("buyer@example.com")?,
                Some("north-type".to_string()),
            )
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn conflict_counts_as_success() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/audiences/aud-1/tags"))
            .respond_with(ResponseTemplate::new(409))
            .expect(2)
            .mount(&server)
            .await;

        let list = list(&server);

        list.ensure_tag("North Type".to_string()).await?;
        list.ensure_tag("North Type".to_string()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn server_error_is_reported() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = list(&server)
            .subscribe(EmailAddress::parse("buyer@example.com")?, None)
            .await;

        assert!(matches!(result, Err(UpstreamError::UnexpectedResponse(_))));

        Ok(())
    }
}
