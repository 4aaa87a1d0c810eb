//! Route handlers.
//!
//! Handlers receive the request, the per-request context (which carries
//! the trace handle) and the request tracer, and return a response or an
//! error. Errors flow back to the dispatcher, which records them on the
//! root span and maps them to the standard error response.

pub mod hello;
pub mod info;

use std::fmt;

/// Error raised by a handler during request processing.
#[derive(Debug)]
pub enum HandlerError {
    /// Failure deliberately triggered via `/hello?fail=1`.
    Simulated,
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Simulated => write!(f, "simulated computation failure"),
        }
    }
}

impl std::error::Error for HandlerError {}
