//! OTLP span export.

use opentelemetry::{KeyValue, trace::TracerProvider as _};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider, Tracer},
};

use crate::config::telemetry::TracingConfig;

use super::ObservabilityError;

/// Exporting provider plus the tracer handed to the subscriber.
pub(super) struct Export {
    pub(super) provider: SdkTracerProvider,
    pub(super) tracer: Tracer,
}

pub(super) fn start(tracing: &TracingConfig) -> Result<Export, ObservabilityError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(tracing.endpoint.clone())
        .with_timeout(tracing.timeout())
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_sampler(sampler(tracing))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource(tracing))
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer(tracing.service_name.clone());

    Ok(Export { provider, tracer })
}

fn resource(tracing: &TracingConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(tracing.service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", tracing.service_version.clone()),
            KeyValue::new("deployment.environment.name", tracing.environment.clone()),
        ])
        .build()
}

fn sampler(tracing: &TracingConfig) -> Sampler {
    Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
        tracing.clamped_sample_ratio(),
    )))
}
