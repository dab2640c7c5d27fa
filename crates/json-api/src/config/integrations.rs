//! Integrations Config

use std::fmt;

use clap::Args;
use foundry_app::integrations::{
    MailConfig, MailingListConfig, payments::DEFAULT_TOLERANCE_SECONDS,
};
use zeroize::Zeroizing;

/// Mail, mailing list and payment provider settings.
#[derive(Args)]
pub struct IntegrationsConfig {
    /// Public site origin used in download links
    #[arg(long, env = "PUBLIC_BASE_URL")]
    pub public_base_url: String,

    /// Transactional mail endpoint
    #[arg(long, env = "MAIL_API_URL")]
    pub mail_api_url: String,

    /// Transactional mail API key
    #[arg(long, env = "MAIL_API_KEY", hide_env_values = true)]
    pub mail_api_key: String,

    /// Sender address for transactional mail
    #[arg(long, env = "MAIL_FROM")]
    pub mail_from: String,

    /// Mailing list provider API root
    #[arg(long, env = "MAILING_LIST_API_URL")]
    pub mailing_list_api_url: String,

    /// Mailing list provider API key
    #[arg(long, env = "MAILING_LIST_API_KEY", hide_env_values = true)]
    pub mailing_list_api_key: String,

    /// Mailing list audience identifier
    #[arg(long, env = "MAILING_LIST_AUDIENCE")]
    pub mailing_list_audience: String,

    /// Stripe webhook signing secret
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    pub stripe_webhook_secret: String,

    /// Accepted age of a signed webhook, in seconds
    #[arg(
        long,
        env = "STRIPE_WEBHOOK_TOLERANCE_SECONDS",
        default_value_t = DEFAULT_TOLERANCE_SECONDS
    )]
    pub stripe_webhook_tolerance_seconds: i64,
}

impl fmt::Debug for IntegrationsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationsConfig")
            .field("public_base_url", &self.public_base_url)
            .field("mail_api_url", &self.mail_api_url)
            .field("mail_from", &self.mail_from)
            .field("mailing_list_api_url", &self.mailing_list_api_url)
            .field("mailing_list_audience", &self.mailing_list_audience)
            .field(
                "stripe_webhook_tolerance_seconds",
                &self.stripe_webhook_tolerance_seconds,
            )
            .finish_non_exhaustive()
    }
}

impl IntegrationsConfig {
    /// Mail adapter settings.
    #[must_use]
    pub fn mail(&self) -> MailConfig {
        MailConfig {
            api_url: self.mail_api_url.clone(),
            api_key: Zeroizing::new(self.mail_api_key.clone()),
            from: self.mail_from.clone(),
            public_base_url: self.public_base_url.clone(),
        }
    }

    /// Mailing list adapter settings.
    #[must_use]
    pub fn mailing_list(&self) -> MailingListConfig {
        MailingListConfig {
            api_url: self.mailing_list_api_url.clone(),
            api_key: Zeroizing::new(self.mailing_list_api_key.clone()),
            audience: self.mailing_list_audience.clone(),
        }
    }
}
