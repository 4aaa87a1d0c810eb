//! OpenTelemetry configuration.

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// OpenTelemetry configuration.
///
/// # Environment variables
///
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: `http://localhost:4317`)
/// - `OTEL_SERVICE_NAME`: service name in traces (default: `otel_hello`)
/// - `OTEL_SERVICE_VERSION`: service version (default: from Cargo.toml)
/// - `OTEL_ENVIRONMENT`: deployment environment (default: `development`)
/// - `OTEL_SAMPLING_RATIO`: sampling ratio 0.0-1.0 (default: `1.0`)
/// - `OTEL_EXPORT_TIMEOUT`: export timeout in seconds (default: `10`)
/// - `OTEL_BATCH_SIZE`: batch export size (default: `512`)
/// - `OTEL_MAX_QUEUE_SIZE`: max export queue size (default: `2048`)
#[derive(Debug, Clone)]
pub struct OtelConfig {
    /// OTLP endpoint (e.g., "http://jaeger:4317")
    pub endpoint: String,
    /// Service name
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment (production, staging, etc.)
    pub environment: String,
    /// Sampling ratio (0.0 - 1.0, 1.0 = sample all)
    pub sampling_ratio: f64,
    /// Export timeout in seconds
    pub export_timeout_secs: u64,
    /// Batch export size
    pub batch_size: usize,
    /// Max queue size
    pub max_queue_size: usize,
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4317".into(),
            service_name: "otel_hello".into(),
            service_version: env!("CARGO_PKG_VERSION").into(),
            environment: "development".into(),
            sampling_ratio: 1.0,
            export_timeout_secs: 10,
            batch_size: 512,
            max_queue_size: 2048,
        }
    }
}

impl OtelConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails when the sampling ratio is outside `[0.0, 1.0]`; a
    /// misconfigured sampler must abort startup rather than silently
    /// record nothing or everything.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sampling_ratio: f64 = env_parse("OTEL_SAMPLING_RATIO", 1.0)?;
        if !(0.0..=1.0).contains(&sampling_ratio) {
            return Err(ConfigError::Invalid {
                key: "OTEL_SAMPLING_RATIO".into(),
                message: format!("{} is not within 0.0..=1.0", sampling_ratio),
            });
        }

        Ok(Self {
            endpoint: env_or("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            service_name: env_or("OTEL_SERVICE_NAME", "otel_hello"),
            service_version: env_or("OTEL_SERVICE_VERSION", env!("CARGO_PKG_VERSION")),
            environment: env_or("OTEL_ENVIRONMENT", "development"),
            sampling_ratio,
            export_timeout_secs: env_parse("OTEL_EXPORT_TIMEOUT", 10)?,
            batch_size: env_parse("OTEL_BATCH_SIZE", 512)?,
            max_queue_size: env_parse("OTEL_MAX_QUEUE_SIZE", 2048)?,
        })
    }
}
