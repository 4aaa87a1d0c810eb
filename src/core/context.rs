//! Per-request context passed explicitly through the dispatch pipeline.

use std::net::IpAddr;
use std::time::Instant;

use crate::trace::RequestTrace;

/// Request-scoped state threaded from the server through the handlers.
///
/// The trace handle travels here explicitly instead of living in an
/// ambient "current span" slot, so child spans created by handlers are
/// parented correctly without any global lookup.
pub struct RequestContext {
    /// Client IP address.
    pub client_ip: IpAddr,

    /// Short request ID for log correlation.
    pub request_id: String,

    /// Request start time.
    pub started_at: Instant,

    /// Per-request trace handle (root/kernel spans, sampling decision).
    pub trace: RequestTrace,
}

impl RequestContext {
    /// Create a new context for an incoming request.
    pub fn new(client_ip: IpAddr, trace: RequestTrace) -> Self {
        let request_id = uuid::Uuid::new_v4().simple().to_string()[..12].to_string();

        Self {
            client_ip,
            request_id,
            started_at: Instant::now(),
            trace,
        }
    }

    /// Milliseconds elapsed since the request started.
    pub fn elapsed_ms(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::RequestTrace;
    use std::net::Ipv4Addr;

    #[test]
    fn test_request_id_shape() {
        let ctx = RequestContext::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            RequestTrace::unsampled(),
        );
        assert_eq!(ctx.request_id.len(), 12);
        assert!(ctx.request_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = RequestContext::new(IpAddr::V4(Ipv4Addr::LOCALHOST), RequestTrace::unsampled());
        let b = RequestContext::new(IpAddr::V4(Ipv4Addr::LOCALHOST), RequestTrace::unsampled());
        assert_ne!(a.request_id, b.request_id);
    }
}
