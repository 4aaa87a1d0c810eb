//! Tracer provider setup: OTLP export to collectors like Jaeger or Zipkin.
//!
//! Builds the SDK tracer provider from [`OtelConfig`] with a batching
//! OTLP gRPC exporter and registers it globally. Construction failure is
//! fatal to startup; a half-configured tracing layer must not serve
//! traffic silently.

use std::time::Duration;

use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{BatchConfigBuilder, BatchSpanProcessor, Config, Sampler, TracerProvider},
    Resource,
};
use tracing::{info, warn};

use crate::config::OtelConfig;

// Semantic convention keys (avoiding dependency on semconv_experimental feature)
const SERVICE_NAME: &str = "service.name";
const SERVICE_VERSION: &str = "service.version";
const DEPLOYMENT_ENVIRONMENT: &str = "deployment.environment";

/// Name under which the application obtains its tracer.
const TRACER_NAME: &str = "otel_hello";

/// Initialize the tracer provider.
///
/// Sampling is decided up front by the request-level gate, so the
/// provider itself runs with an always-on sampler; gate-denied requests
/// never reach it.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be constructed.
pub fn init_tracer(
    config: &OtelConfig,
) -> Result<TracerProvider, Box<dyn std::error::Error + Send + Sync>> {
    let resource = Resource::new([
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, config.service_version.clone()),
        KeyValue::new(DEPLOYMENT_ENVIRONMENT, config.environment.clone()),
    ]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build()?;

    let batch_config = BatchConfigBuilder::default()
        .with_max_export_batch_size(config.batch_size)
        .with_max_queue_size(config.max_queue_size)
        .build();
    let processor = BatchSpanProcessor::builder(exporter, runtime::Tokio)
        .with_batch_config(batch_config)
        .build();

    let provider = TracerProvider::builder()
        .with_span_processor(processor)
        .with_config(
            Config::default()
                .with_resource(resource)
                .with_sampler(Sampler::AlwaysOn),
        )
        .build();

    global::set_tracer_provider(provider.clone());

    info!(
        endpoint = %config.endpoint,
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        sampling = %config.sampling_ratio,
        "OpenTelemetry tracing initialized"
    );

    Ok(provider)
}

/// Obtain the application tracer from a provider.
pub fn app_tracer(provider: &TracerProvider) -> BoxedTracer {
    BoxedTracer::new(Box::new(provider.tracer(TRACER_NAME)))
}

/// Shut down the tracer provider, flushing pending spans.
///
/// Should be called before process exit.
pub fn shutdown_tracer(provider: &TracerProvider) {
    if let Err(err) = provider.shutdown() {
        warn!(error = %err, "tracer provider shutdown reported an error");
    } else {
        info!("OpenTelemetry tracing shutdown complete");
    }
}
