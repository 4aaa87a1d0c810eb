//! otel_hello - A minimal traced web application.
//!
//! This crate demonstrates how to wire OpenTelemetry distributed tracing
//! into an HTTP request lifecycle: a per-request root span, a nested
//! "kernel" span bracketing the in-framework portion of the request,
//! lifecycle stages forwarded as span events, and handler-level child
//! spans whose identifiers are rendered into the response.
//!
//! # Architecture
//!
//! - `trace` - sampling gate, request tracer (root/kernel span lifecycle)
//!   and tracer provider setup with OTLP export
//! - `server` - Tokio/Hyper serving loop and the dispatch pipeline that
//!   delivers lifecycle events to the tracer
//! - `handlers` - the instrumented `/hello` page and the `/info` dump
//!
//! # Example
//!
//! ```rust,ignore
//! use otel_hello::config::Config;
//! use otel_hello::server::{App, Server};
//! use otel_hello::trace::init_tracer;
//!
//! let config = Config::from_env()?;
//! let provider = init_tracer(&config.otel)?;
//! let server = Server::new(config, &provider);
//! server.run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod trace;

// Re-exports for convenience
pub use config::Config;
pub use server::{App, Server};
