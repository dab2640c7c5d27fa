//! Logging & Tracing Config

use std::time::Duration;

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Requests slower than this are logged at warn level
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}

/// OpenTelemetry trace export settings.
#[derive(Debug, Args)]
pub struct TracingConfig {
    /// Export request spans over OTLP
    #[arg(long = "otel-enabled", env = "OTEL_ENABLED", default_value_t = false)]
    pub enabled: bool,

    /// Continue traces from incoming `traceparent` headers
    #[arg(
        long = "otel-parent-propagation-enabled",
        env = "OTEL_PARENT_PROPAGATION_ENABLED",
        default_value_t = false
    )]
    pub parent_propagation: bool,

    /// OTLP gRPC collector endpoint
    #[arg(
        long = "otel-exporter-otlp-endpoint",
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub endpoint: String,

    /// Collector timeout in seconds
    #[arg(
        long = "otel-exporter-otlp-timeout-seconds",
        env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS",
        default_value_t = 3_u64
    )]
    pub timeout_seconds: u64,

    /// Service name attached to exported spans
    #[arg(
        long = "otel-service-name",
        env = "OTEL_SERVICE_NAME",
        default_value = "foundry-json"
    )]
    pub service_name: String,

    /// Service version attached to exported spans
    #[arg(
        long = "otel-service-version",
        env = "OTEL_SERVICE_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub service_version: String,

    /// Deployment environment attached to exported spans
    #[arg(
        long = "otel-deployment-environment",
        env = "OTEL_DEPLOYMENT_ENVIRONMENT",
        default_value = "development"
    )]
    pub environment: String,

    /// Fraction of root traces kept
    #[arg(
        long = "otel-trace-sample-ratio",
        env = "OTEL_TRACE_SAMPLE_RATIO",
        default_value_t = 1.0_f64
    )]
    pub sample_ratio: f64,
}

impl TracingConfig {
    /// Parent propagation only applies while export is on.
    #[must_use]
    pub fn propagates_parent(&self) -> bool {
        self.enabled && self.parent_propagation
    }

    /// Sample ratio clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn clamped_sample_ratio(&self) -> f64 {
        self.sample_ratio.clamp(0.0, 1.0)
    }

    /// Collector timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
