//! Diagnostic dump endpoint.
//!
//! Returns a plain-text dump of runtime and environment information,
//! wrapped in a single span like every other handler.

use std::fmt::Write as _;

use super::HandlerError;
use crate::core::{Request, RequestContext, Response};
use crate::trace::RequestTracer;

/// Name of the span bracketing the dump.
const CONTROLLER_SPAN: &str = "controller:info";

/// Produce the runtime/environment dump.
pub fn index(
    _req: &Request,
    ctx: &RequestContext,
    tracer: &RequestTracer,
) -> Result<Response, HandlerError> {
    let mut span = tracer.start_span(CONTROLLER_SPAN, &ctx.trace);
    let dump = runtime_dump();
    span.end();

    Ok(Response::text(dump))
}

/// Build the dump text: process facts followed by the sorted environment.
fn runtime_dump() -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "otel_hello {}", crate::PKG_VERSION);
    let _ = writeln!(out, "os: {}", std::env::consts::OS);
    let _ = writeln!(out, "arch: {}", std::env::consts::ARCH);
    let _ = writeln!(out, "family: {}", std::env::consts::FAMILY);
    let _ = writeln!(out, "pid: {}", std::process::id());
    if let Ok(parallelism) = std::thread::available_parallelism() {
        let _ = writeln!(out, "cpus: {}", parallelism);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "environment:");
    let mut vars: Vec<(String, String)> = std::env::vars().collect();
    vars.sort();
    for (key, value) in vars {
        let _ = writeln!(out, "  {}={}", key, value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{RequestTracer, SamplingGate};
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode};
    use opentelemetry::global::BoxedTracer;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::{Sampler, TracerProvider};
    use std::net::{IpAddr, Ipv4Addr};

    fn test_tracer(exporter: &InMemorySpanExporter, sampler: Sampler) -> RequestTracer {
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("test");
        RequestTracer::new(BoxedTracer::new(Box::new(tracer)), SamplingGate::new(sampler))
    }

    #[test]
    fn test_dump_is_span_wrapped() {
        let exporter = InMemorySpanExporter::default();
        let tracer = test_tracer(&exporter, Sampler::AlwaysOn);
        let req = Request::new(
            Method::GET,
            "/info".parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
        );
        let ctx = RequestContext::new(IpAddr::V4(Ipv4Addr::LOCALHOST), tracer.begin(&req, true));

        let res = index(&req, &ctx, &tracer).unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = String::from_utf8(res.body().to_vec()).unwrap();
        assert!(body.contains("environment:"));
        assert!(body.contains(crate::PKG_VERSION));

        let spans = exporter.get_finished_spans().unwrap();
        assert!(spans.iter().any(|s| s.name == "controller:info"));
    }

    #[test]
    fn test_dump_survives_denied_gate() {
        let exporter = InMemorySpanExporter::default();
        let tracer = test_tracer(&exporter, Sampler::AlwaysOff);
        let req = Request::new(
            Method::GET,
            "/info".parse().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
        );
        let ctx = RequestContext::new(IpAddr::V4(Ipv4Addr::LOCALHOST), tracer.begin(&req, true));

        let res = index(&req, &ctx, &tracer).unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(exporter.get_finished_spans().unwrap().is_empty());
    }
}
