//! Demo page configuration.

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// Configuration for the instrumented demo page.
///
/// # Environment variables
///
/// - `SIMULATED_WORK_MS`: artificial delay in the `/hello` handler (default: `50`)
/// - `JAEGER_GUI_URL`: link rendered on the page (default: `http://localhost:16686`)
/// - `ZIPKIN_GUI_URL`: link rendered on the page (default: `http://localhost:9411`)
#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Artificial delay simulating computation in the page handler.
    pub simulated_work_ms: u64,
    /// Jaeger UI base URL shown on the rendered page.
    pub jaeger_gui_url: String,
    /// Zipkin UI base URL shown on the rendered page.
    pub zipkin_gui_url: String,
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            simulated_work_ms: env_parse("SIMULATED_WORK_MS", 50)?,
            jaeger_gui_url: env_or("JAEGER_GUI_URL", "http://localhost:16686"),
            zipkin_gui_url: env_or("ZIPKIN_GUI_URL", "http://localhost:9411"),
        })
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            simulated_work_ms: 50,
            jaeger_gui_url: "http://localhost:16686".into(),
            zipkin_gui_url: "http://localhost:9411".into(),
        }
    }
}
