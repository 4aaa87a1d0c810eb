//! Handler-level child spans with guaranteed close-on-exit.

use std::borrow::Cow;

use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;

use super::middleware::NOT_SAMPLED;

/// A child span opened by a handler, or an inert placeholder when the
/// sampling gate denied the request.
///
/// The span is ended when [`end`](Self::end) is called, or on drop if the
/// handler left early (error path); it never ends twice. Identifier
/// accessors always return a well-formed string so rendered output never
/// fails on the unsampled path.
pub struct ChildSpan {
    cx: Option<Context>,
    recording: bool,
    ended: bool,
}

impl ChildSpan {
    /// Wrap a context that carries a freshly started span.
    pub(crate) fn started(cx: Context) -> Self {
        let recording = cx.span().is_recording();
        Self {
            cx: Some(cx),
            recording,
            ended: false,
        }
    }

    /// Inert placeholder for unsampled requests.
    pub(crate) fn not_sampled() -> Self {
        Self {
            cx: None,
            recording: false,
            ended: true,
        }
    }

    /// Span id as a hex string, or the `"not-sampled"` placeholder.
    pub fn span_id(&self) -> String {
        match &self.cx {
            Some(cx) => cx.span().span_context().span_id().to_string(),
            None => NOT_SAMPLED.to_string(),
        }
    }

    /// Trace id as a hex string, or the `"not-sampled"` placeholder.
    pub fn trace_id(&self) -> String {
        match &self.cx {
            Some(cx) => cx.span().span_context().trace_id().to_string(),
            None => NOT_SAMPLED.to_string(),
        }
    }

    /// Append a timestamped event to the span. No-op once ended or when
    /// the request is unsampled.
    pub fn add_event(&self, name: impl Into<Cow<'static, str>>) {
        if self.ended {
            return;
        }
        if let Some(cx) = &self.cx {
            cx.span().add_event(name, Vec::new());
        }
    }

    /// Human-readable sampling state, as rendered on the demo page.
    pub fn recording_label(&self) -> &'static str {
        if self.recording {
            "recording"
        } else {
            "non-recording"
        }
    }

    /// End the span. Idempotent.
    pub fn end(&mut self) {
        if !self.ended {
            if let Some(cx) = &self.cx {
                cx.span().end();
            }
            self.ended = true;
        }
    }
}

impl Drop for ChildSpan {
    fn drop(&mut self) {
        self.end();
    }
}
