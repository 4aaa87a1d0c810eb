//! The instrumented demo page.
//!
//! Opens a span around a simulated computation, then a second span around
//! the render step, and embeds the resulting trace/span identifiers in
//! the page. The two spans run as sequential siblings under the request's
//! root span.

use tokio::time::{sleep, Duration};

use super::HandlerError;
use crate::config::DemoConfig;
use crate::core::{Request, RequestContext, Response};
use crate::trace::RequestTracer;

/// Name of the span bracketing the handler's own work.
const CONTROLLER_SPAN: &str = "controller:hello";

/// Logical template name, used to name the render span.
const TEMPLATE: &str = "hello/index.html";

/// Render the demo page.
///
/// When the sampling gate denied the request, both spans degrade to
/// placeholders and the page renders `"not-sampled"` identifiers instead
/// of failing.
pub async fn index(
    req: &Request,
    ctx: &RequestContext,
    tracer: &RequestTracer,
    config: &DemoConfig,
) -> Result<Response, HandlerError> {
    let mut controller_span = tracer.start_span(CONTROLLER_SPAN, &ctx.trace);

    controller_span.add_event("Start doing stuff");
    // simulate some computation
    sleep(Duration::from_millis(config.simulated_work_ms)).await;
    if req.query_param_is("fail", "1") {
        // span closed by its drop guard on this exit path
        return Err(HandlerError::Simulated);
    }
    controller_span.add_event("Finished doing stuff");
    controller_span.end();

    // render step as a sequential sibling span
    let mut template_span = tracer.start_span(format!("render:{}", TEMPLATE), &ctx.trace);
    let html = render_page(&PageContext {
        trace_id: &ctx.trace.trace_id(),
        controller_span_id: &controller_span.span_id(),
        template_span_id: &template_span.span_id(),
        controller_sampling: controller_span.recording_label(),
        template_sampling: template_span.recording_label(),
        jaeger_gui_url: &config.jaeger_gui_url,
        zipkin_gui_url: &config.zipkin_gui_url,
    });
    template_span.end();

    Ok(Response::html(html))
}

/// Values embedded in the rendered page.
struct PageContext<'a> {
    trace_id: &'a str,
    controller_span_id: &'a str,
    template_span_id: &'a str,
    controller_sampling: &'a str,
    template_sampling: &'a str,
    jaeger_gui_url: &'a str,
    zipkin_gui_url: &'a str,
}

fn render_page(page: &PageContext<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Hello, OpenTelemetry!</title>
    <style>
        body {{ font-family: sans-serif; margin: 2em; }}
        table {{ border-collapse: collapse; }}
        td, th {{ border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }}
        code {{ background: #f4f4f4; padding: 0.1em 0.3em; }}
    </style>
</head>
<body>
    <h1>Hello, OpenTelemetry!</h1>
    <p>This request was traced. Look it up in
        <a href="{jaeger_gui_url}">Jaeger</a> or
        <a href="{zipkin_gui_url}">Zipkin</a>.</p>
    <table>
        <tr><th>Field</th><th>Value</th><th>Sampling</th></tr>
        <tr><td>trace_id</td><td><code>{trace_id}</code></td><td></td></tr>
        <tr><td>controller_span_id</td><td><code>{controller_span_id}</code></td><td>{controller_sampling}</td></tr>
        <tr><td>template_span_id</td><td><code>{template_span_id}</code></td><td>{template_sampling}</td></tr>
    </table>
</body>
</html>
"#,
        jaeger_gui_url = page.jaeger_gui_url,
        zipkin_gui_url = page.zipkin_gui_url,
        trace_id = page.trace_id,
        controller_span_id = page.controller_span_id,
        template_span_id = page.template_span_id,
        controller_sampling = page.controller_sampling,
        template_sampling = page.template_sampling,
    )
}
