//! Core request/response/context types shared by the server, the request
//! tracer and the handlers.

mod context;
mod request;
mod response;

pub use context::RequestContext;
pub use request::Request;
pub use response::Response;
