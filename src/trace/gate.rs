//! Sampling gate: the once-per-request record/drop decision.

use opentelemetry::trace::{SamplingDecision, SpanKind};
use opentelemetry_sdk::trace::{IdGenerator, RandomIdGenerator, Sampler, ShouldSample};

/// Decides whether a request should record and export instrumentation.
///
/// The gate feeds the configured sampler policy a freshly generated
/// candidate trace id on every [`decide`](Self::decide) call. The
/// candidate id only exists to drive ratio-based policies; the final
/// trace id is assigned by the SDK when the root span starts.
///
/// Per-request memoization lives on the request's trace handle, which
/// calls `decide` at most once.
#[derive(Debug)]
pub struct SamplingGate {
    sampler: Box<dyn ShouldSample>,
    ids: RandomIdGenerator,
}

impl SamplingGate {
    /// Create a gate around an arbitrary sampler policy.
    pub fn new<S: ShouldSample + 'static>(sampler: S) -> Self {
        Self {
            sampler: Box::new(sampler),
            ids: RandomIdGenerator::default(),
        }
    }

    /// Create a gate with a trace-id-ratio policy (the default setup).
    pub fn ratio(ratio: f64) -> Self {
        Self::new(Sampler::TraceIdRatioBased(ratio))
    }

    /// Evaluate the sampler policy once.
    pub fn decide(&self) -> bool {
        let candidate = self.ids.new_trace_id();
        let result = self.sampler.should_sample(
            None,
            candidate,
            "",
            &SpanKind::Internal,
            &[],
            &[],
        );
        matches!(result.decision, SamplingDecision::RecordAndSample)
    }
}
