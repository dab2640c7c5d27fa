//! Logs, traces and metrics for the JSON API.

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod otel;
mod request;

pub(crate) use init::Observability;
pub(crate) use metrics::{DownloadOutcome, metrics_handler, record_download};
pub(crate) use request::request_logging;

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to build OTLP exporter.
    #[error("failed to build OTLP exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Telemetry was already initialised in this process.
    #[error("telemetry is already initialised")]
    AlreadyInitialised,

    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
