//! Telemetry lifecycle and the settings the request middleware reads.

use std::sync::OnceLock;

use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::{error, info};

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, otel};

/// Per-request knobs fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestSettings {
    pub(super) slow_request_threshold_ms: u64,
    pub(super) propagate_parent: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            slow_request_threshold_ms: 1_000,
            propagate_parent: false,
        }
    }
}

static REQUEST_SETTINGS: OnceLock<RequestSettings> = OnceLock::new();

pub(super) fn request_settings() -> RequestSettings {
    REQUEST_SETTINGS.get().copied().unwrap_or_default()
}

/// Runtime telemetry state.
#[derive(Debug)]
pub(crate) struct Observability {
    provider: Option<SdkTracerProvider>,
}

impl Observability {
    /// Install the log subscriber and, when enabled, OTLP span export.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        REQUEST_SETTINGS
            .set(RequestSettings {
                slow_request_threshold_ms: config.logging.slow_request_threshold_ms,
                propagate_parent: config.tracing.propagates_parent(),
            })
            .map_err(|_already| ObservabilityError::AlreadyInitialised)?;

        let (provider, tracer) = if config.tracing.enabled {
            let export = otel::start(&config.tracing)?;

            (Some(export.provider), Some(export.tracer))
        } else {
            (None, None)
        };

        logging::init_subscriber(&config.logging, tracer)?;

        info!(
            service = %config.tracing.service_name,
            environment = %config.tracing.environment,
            otel_enabled = config.tracing.enabled,
            "telemetry initialised"
        );

        Ok(Self { provider })
    }

    /// Flush pending spans.
    pub(crate) fn shutdown(self) {
        let Some(provider) = self.provider else {
            return;
        };

        if let Err(source) = provider.shutdown() {
            error!("failed to shutdown tracer provider: {source}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_settings_fall_back_before_init() {
        assert_eq!(request_settings(), RequestSettings::default());
        assert!(!request_settings().propagate_parent, "propagation is opt-in");
    }
}
