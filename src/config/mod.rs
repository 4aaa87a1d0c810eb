//! Configuration module for otel_hello.
//!
//! This module provides centralized configuration loading from environment
//! variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use otel_hello::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! ```

mod demo;
mod error;
mod otel;
mod parse;
mod server;

pub use demo::DemoConfig;
pub use error::ConfigError;
pub use otel::OtelConfig;
pub use server::ServerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// OpenTelemetry configuration.
    pub otel: OtelConfig,
    /// Demo page configuration.
    pub demo: DemoConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            otel: OtelConfig::from_env()?,
            demo: DemoConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  OTLP endpoint: {}", self.otel.endpoint);
        info!("  Service: {}", self.otel.service_name);
        info!("  Sampling ratio: {}", self.otel.sampling_ratio);
        info!("  Simulated work: {}ms", self.demo.simulated_work_ms);
    }
}
