//! End-to-end dispatch pipeline tests.
//!
//! Drive full requests through the dispatcher with an in-memory span
//! exporter and assert on the exported trace: span nesting, end order,
//! lifecycle events, exception recording and sampling degradation.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use opentelemetry::global::BoxedTracer;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::{Sampler, TracerProvider};

use otel_hello::config::{Config, DemoConfig, OtelConfig, ServerConfig};
use otel_hello::core::Request;
use otel_hello::server::{dispatch, App};
use otel_hello::trace::{RequestTracer, SamplingGate, NOT_SAMPLED};

fn test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        otel: OtelConfig::default(),
        demo: DemoConfig::default(),
    }
}

fn test_app(exporter: &InMemorySpanExporter, sampler: Sampler) -> App {
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    let tracer = RequestTracer::new(
        BoxedTracer::new(Box::new(provider.tracer("test"))),
        SamplingGate::new(sampler),
    );
    App::new(test_config(), tracer)
}

fn request(method: Method, uri: &str) -> Request {
    let mut headers = HeaderMap::new();
    headers.insert("host", "localhost:8080".parse().unwrap());
    Request::new(method, uri.parse().unwrap(), headers, Bytes::new())
}

fn exported(exporter: &InMemorySpanExporter) -> Vec<SpanData> {
    exporter.get_finished_spans().unwrap()
}

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[tokio::test]
async fn test_sampled_hello_request_end_to_end() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    let started = Instant::now();
    let response = dispatch(&app, &request(Method::GET, "/hello"), LOCALHOST).await;
    assert!(started.elapsed().as_millis() >= 50);
    assert_eq!(response.status(), StatusCode::OK);

    let spans = exported(&exporter);
    // controller, render, kernel, root
    assert_eq!(spans.len(), 4);

    let root = spans.iter().find(|s| s.name == "/hello").unwrap();
    let kernel = spans.iter().find(|s| s.name == "kernel").unwrap();
    let controller = spans.iter().find(|s| s.name == "controller:hello").unwrap();
    let render = spans
        .iter()
        .find(|s| s.name == "render:hello/index.html")
        .unwrap();

    // one trace, everything parented on the root span
    for span in &spans {
        assert_eq!(span.span_context.trace_id(), root.span_context.trace_id());
    }
    assert_eq!(kernel.parent_span_id, root.span_context.span_id());
    assert_eq!(controller.parent_span_id, root.span_context.span_id());
    assert_eq!(render.parent_span_id, root.span_context.span_id());

    // sequential siblings, then kernel ends before root
    assert!(render.start_time >= controller.end_time);
    assert!(kernel.end_time <= root.end_time);
    assert!(root.end_time >= root.start_time);

    // the exported controller span covers the simulated delay
    let controller_duration = controller
        .end_time
        .duration_since(controller.start_time)
        .unwrap();
    assert!(controller_duration.as_millis() >= 50);

    // the page embeds the real identifiers
    let body = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(body.contains(&root.span_context.trace_id().to_string()));
    assert!(body.contains(&controller.span_context.span_id().to_string()));
    assert!(body.contains(&render.span_context.span_id().to_string()));
    assert_ne!(
        controller.span_context.span_id(),
        render.span_context.span_id()
    );
    assert_eq!(body.matches("recording").count(), 2);
    assert!(!body.contains(NOT_SAMPLED));
}

#[tokio::test]
async fn test_lifecycle_events_on_root_in_delivery_order() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    dispatch(&app, &request(Method::GET, "/hello"), LOCALHOST).await;

    let spans = exported(&exporter);
    let root = spans.iter().find(|s| s.name == "/hello").unwrap();
    let names: Vec<_> = root.events.iter().map(|e| e.name.as_ref()).collect();
    assert_eq!(
        names,
        vec![
            "kernel.request",
            "kernel.controller",
            "kernel.controller_arguments",
            "kernel.view",
            "kernel.response",
            "kernel.finish_request",
            "kernel.terminate",
        ]
    );
}

#[tokio::test]
async fn test_unsampled_request_degrades_to_placeholders() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOff);

    let response = dispatch(&app, &request(Method::GET, "/hello"), LOCALHOST).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = String::from_utf8(response.body().to_vec()).unwrap();
    // trace_id, controller_span_id, template_span_id
    assert_eq!(body.matches(NOT_SAMPLED).count(), 3);
    assert_eq!(body.matches("non-recording").count(), 2);
    assert!(exported(&exporter).is_empty());
}

#[tokio::test]
async fn test_handler_failure_records_exception_and_closes_root() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    let response = dispatch(&app, &request(Method::GET, "/hello?fail=1"), LOCALHOST).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let spans = exported(&exporter);
    let root = spans.iter().find(|s| s.name == "/hello").unwrap();
    let exceptions: Vec<_> = root
        .events
        .iter()
        .filter(|e| e.name == "exception")
        .collect();
    assert_eq!(exceptions.len(), 1);
    assert!(root.end_time >= root.start_time);

    // the controller span was closed by its guard despite the early return
    assert!(spans.iter().any(|s| s.name == "controller:hello"));
}

#[tokio::test]
async fn test_not_found_is_still_traced() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    let response = dispatch(&app, &request(Method::GET, "/missing"), LOCALHOST).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let spans = exported(&exporter);
    assert_eq!(spans.len(), 2);
    assert!(spans.iter().any(|s| s.name == "/missing"));
    assert!(spans.iter().any(|s| s.name == "kernel"));
}

#[tokio::test]
async fn test_info_dump_is_span_wrapped() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    let response = dispatch(&app, &request(Method::GET, "/info"), LOCALHOST).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(body.contains("environment:"));

    let spans = exported(&exporter);
    assert_eq!(spans.len(), 3);
    let root = spans.iter().find(|s| s.name == "/info").unwrap();
    let controller = spans.iter().find(|s| s.name == "controller:info").unwrap();
    assert_eq!(controller.parent_span_id, root.span_context.span_id());
}

#[tokio::test]
async fn test_post_is_not_routed() {
    let exporter = InMemorySpanExporter::default();
    let app = test_app(&exporter, Sampler::AlwaysOn);

    let response = dispatch(&app, &request(Method::POST, "/hello"), LOCALHOST).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
