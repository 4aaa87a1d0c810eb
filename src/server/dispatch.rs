//! Request dispatch: routing plus lifecycle event delivery to the tracer.
//!
//! The dispatcher is the host side of the request tracing middleware: it
//! opens the trace at request start, announces each lifecycle stage as it
//! passes through, records handler failures, and terminates the trace
//! after the response is decided. Tracing never alters the functional
//! response; the error path below produces the same 500 it would without
//! instrumentation.

use std::net::IpAddr;

use tracing::error;

use super::router::{self, Route};
use super::App;
use crate::core::{Request, RequestContext, Response};
use crate::handlers;
use crate::logging;
use crate::trace::LifecycleStage;

/// Process one request end to end.
pub async fn dispatch(app: &App, req: &Request, client_ip: IpAddr) -> Response {
    let trace = app.tracer.begin(req, true);
    let mut ctx = RequestContext::new(client_ip, trace);

    let route = router::resolve(req.method(), req.path());
    ctx.trace.lifecycle(LifecycleStage::ControllerResolved);
    ctx.trace.lifecycle(LifecycleStage::ArgumentsResolved);

    let result = match route {
        Route::Hello => handlers::hello::index(req, &ctx, &app.tracer, &app.config.demo).await,
        Route::Info => handlers::info::index(req, &ctx, &app.tracer),
        Route::NotFound => Ok(Response::not_found()),
    };

    let response = match result {
        Ok(res) => {
            ctx.trace.lifecycle(LifecycleStage::ViewProduced);
            res
        }
        Err(err) => {
            ctx.trace.record_exception(&err);
            error!(error = %err, path = req.path(), "handler failed");
            Response::internal_error("Internal Server Error")
        }
    };

    ctx.trace.lifecycle(LifecycleStage::ResponseProduced);
    ctx.trace.lifecycle(LifecycleStage::RequestFinished);

    let trace_id = ctx.trace.trace_id();
    let span_id = ctx.trace.root_span_id();
    logging::log_access(
        &ctx.request_id,
        &ctx.client_ip.to_string(),
        req.method().as_str(),
        req.path(),
        route.name(),
        response.status().as_u16(),
        response.body().len() as u64,
        ctx.elapsed_ms(),
        &trace_id,
        &span_id,
    );

    ctx.trace.terminate();
    response
}
