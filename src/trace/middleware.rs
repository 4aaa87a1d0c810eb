//! Request tracing middleware: the per-request root/kernel span lifecycle.
//!
//! One root span brackets the whole request and one nested "kernel" span
//! brackets the in-framework portion. The root span starts under the
//! fixed name `main`, is renamed to the request URI once the top-level
//! request is identified, and carries the standard HTTP attributes plus
//! one event per lifecycle stage. The kernel span always ends strictly
//! before the root span so the exported trace nests cleanly.
//!
//! State machine per request:
//! `idle -> root_open -> request_open -> request_closed -> root_closed`,
//! where the whole chain collapses to `idle` when the sampling gate
//! denies the request.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use opentelemetry::global::BoxedTracer;
use opentelemetry::trace::{SpanKind, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_semantic_conventions::trace::{
    HTTP_REQUEST_METHOD, NETWORK_PROTOCOL_VERSION, SERVER_ADDRESS, URL_FULL, URL_PATH, URL_SCHEME,
    USER_AGENT_ORIGINAL,
};

use super::gate::SamplingGate;
use super::span::ChildSpan;
use super::LifecycleStage;
use crate::core::Request;

/// Placeholder identifier rendered when the sampling gate denied the request.
pub const NOT_SAMPLED: &str = "not-sampled";

/// Root span name before it is renamed to the request URI.
const ROOT_SPAN_NAME: &str = "main";

/// Name of the child span bracketing the in-framework request portion.
const KERNEL_SPAN_NAME: &str = "kernel";

// No stable semantic convention constant for this one yet.
const HTTP_REQUEST_CONTENT_LENGTH: &str = "http.request_content_length";

/// Opens and owns per-request trace handles.
///
/// One instance serves the whole application; all per-request state lives
/// in the [`RequestTrace`] it hands out.
pub struct RequestTracer {
    tracer: BoxedTracer,
    gate: Arc<SamplingGate>,
}

impl RequestTracer {
    /// Create a tracer around an injected SDK tracer and sampler gate.
    pub fn new(tracer: BoxedTracer, gate: SamplingGate) -> Self {
        Self {
            tracer,
            gate: Arc::new(gate),
        }
    }

    /// Request-received hook. Opens the root span (and, on the top-level
    /// request, the kernel child span plus HTTP attributes) when the gate
    /// allows; otherwise returns an inert handle and every later hook is
    /// a no-op.
    pub fn begin(&self, req: &Request, is_main: bool) -> RequestTrace {
        let mut trace = RequestTrace::idle(self.gate.clone(), is_main);
        if !trace.sampled() {
            return trace;
        }

        let root = self
            .tracer
            .span_builder(ROOT_SPAN_NAME)
            .with_kind(SpanKind::Server)
            .start(&self.tracer);
        let root_cx = Context::new().with_span(root);
        root_cx
            .span()
            .add_event(LifecycleStage::RequestReceived.as_str(), Vec::new());

        if is_main {
            let kernel = self
                .tracer
                .span_builder(KERNEL_SPAN_NAME)
                .with_kind(SpanKind::Internal)
                .start_with_context(&self.tracer, &root_cx);
            trace.kernel = Some(root_cx.with_span(kernel));

            root_cx.span().update_name(req.path().to_owned());
            populate_request_attributes(&root_cx, req);
        }

        trace.root = Some(root_cx);
        trace
    }

    /// Start a handler-level child span under the request's root span.
    ///
    /// Queries the gate (memoized on the handle) first; on the unsampled
    /// path this allocates nothing and returns a placeholder.
    pub fn start_span(&self, name: impl Into<Cow<'static, str>>, trace: &RequestTrace) -> ChildSpan {
        if !trace.sampled() {
            return ChildSpan::not_sampled();
        }
        match &trace.root {
            Some(parent) => {
                let span = self
                    .tracer
                    .span_builder(name)
                    .with_kind(SpanKind::Internal)
                    .start_with_context(&self.tracer, parent);
                ChildSpan::started(parent.with_span(span))
            }
            None => ChildSpan::not_sampled(),
        }
    }
}

/// Stamp standard HTTP attributes onto the root span.
fn populate_request_attributes(root_cx: &Context, req: &Request) {
    let span = root_cx.span();
    span.set_attribute(KeyValue::new(HTTP_REQUEST_METHOD, req.method().to_string()));
    span.set_attribute(KeyValue::new(URL_FULL, req.full_url()));
    span.set_attribute(KeyValue::new(URL_PATH, req.path().to_owned()));
    span.set_attribute(KeyValue::new(URL_SCHEME, req.scheme()));
    span.set_attribute(KeyValue::new(NETWORK_PROTOCOL_VERSION, req.protocol()));
    if let Some(host) = req.host() {
        span.set_attribute(KeyValue::new(SERVER_ADDRESS, host.to_owned()));
    }
    if let Some(ua) = req.user_agent() {
        span.set_attribute(KeyValue::new(USER_AGENT_ORIGINAL, ua.to_owned()));
    }
    if let Some(len) = req.content_length() {
        span.set_attribute(KeyValue::new(HTTP_REQUEST_CONTENT_LENGTH, len as i64));
    }
}

/// Per-request trace handle, passed explicitly through the dispatch
/// pipeline and into handlers.
///
/// Owns the root and kernel spans for the request. Both spans are ended
/// exactly once: normally by [`terminate`](Self::terminate), or by the
/// drop guard if the request unwinds early.
pub struct RequestTrace {
    gate: Option<Arc<SamplingGate>>,
    decision: OnceLock<bool>,
    root: Option<Context>,
    kernel: Option<Context>,
    root_ended: bool,
    kernel_ended: bool,
    main: bool,
}

impl RequestTrace {
    fn idle(gate: Arc<SamplingGate>, main: bool) -> Self {
        Self {
            gate: Some(gate),
            decision: OnceLock::new(),
            root: None,
            kernel: None,
            root_ended: false,
            kernel_ended: false,
            main,
        }
    }

    /// A handle that never records. Used for tests and as the inert value
    /// before a request begins.
    pub fn unsampled() -> Self {
        let decision = OnceLock::new();
        let _ = decision.set(false);
        Self {
            gate: None,
            decision,
            root: None,
            kernel: None,
            root_ended: false,
            kernel_ended: false,
            main: true,
        }
    }

    /// The memoized sampling decision for this request.
    ///
    /// Computed from the gate on first call and never recomputed, so the
    /// middleware and the handlers always agree within one request.
    pub fn sampled(&self) -> bool {
        *self
            .decision
            .get_or_init(|| self.gate.as_ref().map(|g| g.decide()).unwrap_or(false))
    }

    /// Append a lifecycle stage event to the root span, in delivery
    /// order. No-op when unsampled or after the root span ended.
    pub fn lifecycle(&self, stage: LifecycleStage) {
        if self.root_ended {
            return;
        }
        if let Some(cx) = &self.root {
            cx.span().add_event(stage.as_str(), Vec::new());
        }
    }

    /// Record an exception as a structured error event on the root span.
    /// The error itself is neither swallowed nor converted; the caller's
    /// error handling proceeds unchanged.
    pub fn record_exception(&self, err: &dyn std::error::Error) {
        if self.root_ended {
            return;
        }
        if let Some(cx) = &self.root {
            cx.span().record_error(err);
        }
    }

    /// Request-terminated hook: appends the final stage event, then ends
    /// the kernel span followed by the root span (top-level requests
    /// only). Terminal and idempotent.
    pub fn terminate(&mut self) {
        self.lifecycle(LifecycleStage::RequestTerminated);
        if self.main {
            self.end_spans();
        }
    }

    /// Trace id as a hex string, or the `"not-sampled"` placeholder.
    pub fn trace_id(&self) -> String {
        match &self.root {
            Some(cx) => cx.span().span_context().trace_id().to_string(),
            None => NOT_SAMPLED.to_string(),
        }
    }

    /// Root span id as a hex string, or the `"not-sampled"` placeholder.
    pub fn root_span_id(&self) -> String {
        match &self.root {
            Some(cx) => cx.span().span_context().span_id().to_string(),
            None => NOT_SAMPLED.to_string(),
        }
    }

    /// Whether the root span is currently open.
    pub fn is_open(&self) -> bool {
        self.root.is_some() && !self.root_ended
    }

    // Kernel before root, so nesting stays strict in the exported trace.
    fn end_spans(&mut self) {
        if let Some(cx) = &self.kernel {
            if !self.kernel_ended {
                cx.span().end();
                self.kernel_ended = true;
            }
        }
        if let Some(cx) = &self.root {
            if !self.root_ended {
                cx.span().end();
                self.root_ended = true;
            }
        }
    }
}

impl Drop for RequestTrace {
    fn drop(&mut self) {
        self.end_spans();
    }
}
