//! HTTP server configuration.

use std::net::SocketAddr;

use super::parse::env_or;
use super::ConfigError;

/// Server configuration.
///
/// # Environment variables
///
/// - `LISTEN_ADDR`: socket address to bind (default: `0.0.0.0:8080`)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or("LISTEN_ADDR", "0.0.0.0:8080");
        let listen_addr = raw.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Parse {
                key: "LISTEN_ADDR".into(),
                value: raw.clone(),
                error: e.to_string(),
            }
        })?;

        Ok(Self { listen_addr })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 8080).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr.port(), 8080);
    }
}
