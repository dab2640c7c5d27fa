//! Server configuration module

use clap::Parser;
use foundry_app::context::AppConfig;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    integrations::IntegrationsConfig,
    server::ServerRuntimeConfig,
    telemetry::{LoggingConfig, TracingConfig},
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod integrations;
pub(crate) mod server;
pub(crate) mod telemetry;

/// Foundry JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "foundry-json", about = "Foundry JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Trace export settings.
    #[command(flatten)]
    pub tracing: TracingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Service authentication settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Collaborator settings.
    #[command(flatten)]
    pub integrations: IntegrationsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings for wiring the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            run_migrations: self.database.run_migrations,
            mail: self.integrations.mail(),
            mailing_list: self.integrations.mailing_list(),
            stripe_webhook_secret: self.integrations.stripe_webhook_secret.clone(),
            stripe_webhook_tolerance_seconds: self.integrations.stripe_webhook_tolerance_seconds,
        }
    }
}
