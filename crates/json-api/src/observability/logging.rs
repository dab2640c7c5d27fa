//! Logging subscriber initialisation.

use opentelemetry_sdk::trace::Tracer;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::telemetry::{LogFormat, LoggingConfig};

use super::ObservabilityError;

/// Dependencies that are only interesting when something breaks.
const QUIET_TARGETS: &str = concat!(
    "h2=warn,hyper=warn,reqwest=warn,sqlx=warn,",
    "tonic=warn,tower=warn,opentelemetry=warn"
);

pub(super) fn init_subscriber(
    logging: &LoggingConfig,
    tracer: Option<Tracer>,
) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_unset| EnvFilter::new(filter_directives(&logging.log_level)));

    match logging.log_format {
        LogFormat::Compact => install(
            filter,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
            tracer,
        ),
        LogFormat::Json => install(
            filter,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
            tracer,
        ),
    }
}

fn filter_directives(log_level: &str) -> String {
    format!("{log_level},{QUIET_TARGETS}")
}

fn install<L>(
    filter: EnvFilter,
    fmt_layer: L,
    tracer: Option<Tracer>,
) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    if let Some(tracer) = tracer {
        subscriber
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::filter_directives;

    #[test]
    fn configured_level_leads_the_directives() {
        let directives = filter_directives("debug");

        assert!(directives.starts_with("debug,"), "got {directives}");
        assert!(directives.contains("sqlx=warn"), "got {directives}");
    }
}
