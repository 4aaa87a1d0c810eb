//! HTTP request abstraction for dispatch and handlers.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri};

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static CONTENT_LENGTH: HeaderName = header::CONTENT_LENGTH;
    pub static HOST: HeaderName = header::HOST;
    pub static USER_AGENT: HeaderName = header::USER_AGENT;
}

/// HTTP request for dispatch and handlers.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
/// Use references or move semantics instead.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    version: http::Version,
    scheme: &'static str,
}

impl Request {
    /// Create a new request.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            version: http::Version::HTTP_11,
            scheme: "http",
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Get the query string.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get the HTTP version.
    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    /// Set the HTTP version.
    #[inline]
    pub fn set_version(&mut self, version: http::Version) {
        self.version = version;
    }

    /// URI scheme the request arrived on.
    #[inline]
    pub fn scheme(&self) -> &'static str {
        self.scheme
    }

    /// Protocol version as a display string ("HTTP/1.1", "HTTP/2.0").
    pub fn protocol(&self) -> &'static str {
        match self.version {
            http::Version::HTTP_10 => "HTTP/1.0",
            http::Version::HTTP_2 => "HTTP/2.0",
            _ => "HTTP/1.1",
        }
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get Host header value.
    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.headers
            .get(&header_names::HOST)
            .and_then(|v| v.to_str().ok())
    }

    /// Get User-Agent header value.
    #[inline]
    pub fn user_agent(&self) -> Option<&str> {
        self.headers
            .get(&header_names::USER_AGENT)
            .and_then(|v| v.to_str().ok())
    }

    /// Get Content-Length header value, parsed.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(&header_names::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Full URL of the request, reconstructed from scheme + host + URI.
    pub fn full_url(&self) -> String {
        match self.host() {
            Some(host) => format!("{}://{}{}", self.scheme, host, self.uri),
            None => self.uri.to_string(),
        }
    }

    /// Check whether a query parameter is present with the given value.
    pub fn query_param_is(&self, name: &str, value: &str) -> bool {
        self.query()
            .map(|q| {
                q.split('&')
                    .any(|pair| pair.split_once('=') == Some((name, value)))
            })
            .unwrap_or(false)
    }
}
