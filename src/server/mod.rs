//! HTTP serving loop.
//!
//! One Tokio task per connection, hyper for HTTP/1.1, dispatch through
//! the request tracer. The server owns the shared [`App`] state.

mod dispatch;
mod router;

pub use dispatch::dispatch;
pub use router::{resolve, Route};

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use opentelemetry_sdk::trace::TracerProvider;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::Request;
use crate::trace::{app_tracer, RequestTracer, SamplingGate};

/// Shared application state.
pub struct App {
    /// Application configuration.
    pub config: Config,
    /// The request tracer driving per-request spans.
    pub tracer: RequestTracer,
}

impl App {
    /// Create application state from parts.
    pub fn new(config: Config, tracer: RequestTracer) -> Self {
        Self { config, tracer }
    }
}

/// The HTTP server.
pub struct Server {
    app: Arc<App>,
}

impl Server {
    /// Build a server whose tracer and sampling gate come from the given
    /// provider and configuration.
    pub fn new(config: Config, provider: &TracerProvider) -> Self {
        let gate = SamplingGate::ratio(config.otel.sampling_ratio);
        let tracer = RequestTracer::new(app_tracer(provider), gate);
        Self {
            app: Arc::new(App::new(config, tracer)),
        }
    }

    /// Accept connections until the listener fails.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.app.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", addr);

        loop {
            let (stream, peer) = listener.accept().await?;
            let app = self.app.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| serve(app.clone(), req, peer));
                if let Err(err) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                    .serve_connection(io, service)
                    .await
                {
                    debug!(peer = %peer, error = %err, "connection error");
                }
            });
        }
    }
}

/// Convert a hyper request, dispatch it and convert the response back.
async fn serve(
    app: Arc<App>,
    req: hyper::Request<hyper::body::Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            debug!(peer = %peer, error = %err, "failed to read request body");
            Bytes::new()
        }
    };

    let mut request = Request::new(parts.method, parts.uri, parts.headers, body);
    request.set_version(parts.version);

    let response = dispatch(&app, &request, peer.ip()).await;
    Ok(response.into_hyper())
}
