//! Request-lifecycle tracing.
//!
//! The pieces here follow one pattern: a per-request root span with
//! sampling-gated instrumentation and nested child spans.
//!
//! - [`SamplingGate`] decides once per request whether to record anything.
//! - [`RequestTracer`] owns the tracer and opens the root/"kernel" span
//!   pair at request start; the resulting [`RequestTrace`] handle travels
//!   through the dispatch pipeline, collects lifecycle events and
//!   exceptions, and closes both spans at request end.
//! - Handlers open their own [`ChildSpan`]s through the tracer; when the
//!   gate denied the request those degrade to placeholders that still
//!   yield well-formed identifier strings.

mod gate;
mod middleware;
mod provider;
mod span;

pub use gate::SamplingGate;
pub use middleware::{RequestTrace, RequestTracer, NOT_SAMPLED};
pub use provider::{app_tracer, init_tracer, shutdown_tracer};
pub use span::ChildSpan;

/// Stages of the request lifecycle delivered to the request tracer.
///
/// Each stage delivered while the root span is open appends exactly one
/// event record to it, in delivery order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleStage {
    /// Request received, routing about to run.
    RequestReceived,
    /// Handler resolved from the route table.
    ControllerResolved,
    /// Handler arguments bound.
    ArgumentsResolved,
    /// Handler produced a view/result.
    ViewProduced,
    /// Response object materialized.
    ResponseProduced,
    /// Request processing finished.
    RequestFinished,
    /// Request fully terminated; spans close after this stage.
    RequestTerminated,
}

impl LifecycleStage {
    /// Event name recorded on the root span.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::RequestReceived => "kernel.request",
            LifecycleStage::ControllerResolved => "kernel.controller",
            LifecycleStage::ArgumentsResolved => "kernel.controller_arguments",
            LifecycleStage::ViewProduced => "kernel.view",
            LifecycleStage::ResponseProduced => "kernel.response",
            LifecycleStage::RequestFinished => "kernel.finish_request",
            LifecycleStage::RequestTerminated => "kernel.terminate",
        }
    }
}
