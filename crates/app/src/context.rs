//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        checkout::{CheckoutService, OrderCheckoutService},
        downloads::{DownloadsService, OrderDownloadsService},
        orders::{OrdersService, PgOrdersService},
    },
    integrations::{
        HttpMailer, HttpMailingList, MailConfig, MailingList, MailingListConfig,
        StripeWebhookVerifier,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),
}

/// Settings needed to wire the application services.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub run_migrations: bool,
    pub mail: MailConfig,
    pub mailing_list: MailingListConfig,
    pub stripe_webhook_secret: String,
    pub stripe_webhook_tolerance_seconds: i64,
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub downloads: Arc<dyn DownloadsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub mailing_list: Arc<dyn MailingList>,
    pub webhooks: StripeWebhookVerifier,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if config.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let orders: Arc<dyn OrdersService> = Arc::new(PgOrdersService::new(Db::new(pool)));
        let mailing_list: Arc<dyn MailingList> =
            Arc::new(HttpMailingList::new(config.mailing_list));

        Ok(Self {
            downloads: Arc::new(OrderDownloadsService::new(orders.clone())),
            checkout: Arc::new(OrderCheckoutService::new(
                orders.clone(),
                Arc::new(HttpMailer::new(config.mail)),
                mailing_list.clone(),
            )),
            webhooks: StripeWebhookVerifier::new(
                config.stripe_webhook_secret,
                config.stripe_webhook_tolerance_seconds,
            ),
            orders,
            mailing_list,
        })
    }
}
