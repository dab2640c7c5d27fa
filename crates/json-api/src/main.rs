//! Foundry JSON API Server

use std::process;

use foundry::pricing::format_minor;
use salvo::prelude::*;
use tracing::{error, info};

use foundry_app::context::AppContext;

use crate::{
    auth::ApiTokenDigest, config::ServerConfig, observability::Observability, state::State,
};

mod auth;
mod checkout;
mod config;
mod downloads;
mod extensions;
mod healthcheck;
mod newsletter;
mod observability;
mod orders;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod webhooks;

/// Foundry JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    if let Err(pricing_error) = format_minor(0, &config.server.currency) {
        error!("invalid currency configuration: {pricing_error}");
        observability.shutdown();

        process::exit(1);
    }

    let app = match AppContext::from_config(config.app_config()).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");
            observability.shutdown();

            process::exit(1);
        }
    };

    let state = State::shared(
        app,
        ApiTokenDigest::new(&config.auth.api_token),
        config.server.currency.clone(),
    );

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router::app_router(state)).await;

    observability.shutdown();
}
