//! HTTP response abstraction for dispatch and handlers.

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};

/// Pre-allocated static header values for common content types.
mod content_types {
    use super::*;
    pub static TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain; charset=utf-8");
    pub static TEXT_HTML: HeaderValue = HeaderValue::from_static("text/html; charset=utf-8");
}

/// Pre-allocated static bodies for common responses.
mod static_bodies {
    use super::*;
    pub static NOT_FOUND: Bytes = Bytes::from_static(b"Not Found");
}

/// HTTP response.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
/// Use references or move semantics instead.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a 200 OK response with a plain-text body.
    #[inline]
    pub fn text(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(header::CONTENT_TYPE, content_types::TEXT_PLAIN.clone());
        Self {
            status: StatusCode::OK,
            headers,
            body: body.into(),
        }
    }

    /// Create a 200 OK response with an HTML body.
    #[inline]
    pub fn html(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(header::CONTENT_TYPE, content_types::TEXT_HTML.clone());
        Self {
            status: StatusCode::OK,
            headers,
            body: body.into(),
        }
    }

    /// Create a 404 Not Found response (uses static body).
    #[inline]
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: static_bodies::NOT_FOUND.clone(), // Bytes::clone is cheap (Arc)
        }
    }

    /// Create a 500 Internal Server Error response.
    #[inline]
    pub fn internal_error(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(msg.as_bytes()),
        }
    }

    /// Get the status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Add a header by name and value, ignoring invalid input.
    #[inline]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Convert into a hyper response.
    pub fn into_hyper(self) -> http::Response<http_body_util::Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers;
        }
        // Builder cannot fail here: status and headers are already validated.
        builder
            .body(http_body_util::Full::new(self.body))
            .unwrap_or_else(|_| http::Response::new(http_body_util::Full::new(Bytes::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response() {
        let res = Response::text("hello");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body().as_ref(), b"hello");
    }

    #[test]
    fn test_html_response() {
        let res = Response::html("<html></html>");
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    }

    #[test]
    fn test_not_found() {
        let res = Response::not_found();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error() {
        let res = Response::internal_error("boom");
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body().as_ref(), b"boom");
    }

    #[test]
    fn test_with_header() {
        let res = Response::text("x").with_header("x-demo", "1");
        assert_eq!(res.header("x-demo"), Some("1"));
    }

    #[test]
    fn test_into_hyper_preserves_status_and_headers() {
        let res = Response::html("<p>hi</p>").with_header("x-demo", "1");
        let hyper_res = res.into_hyper();
        assert_eq!(hyper_res.status(), StatusCode::OK);
        assert_eq!(
            hyper_res.headers().get("x-demo").unwrap().to_str().unwrap(),
            "1"
        );
    }
}
