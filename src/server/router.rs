//! Route table.

use http::Method;

/// Resolved route for a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// The instrumented demo page.
    Hello,
    /// The runtime/environment dump.
    Info,
    /// No handler matched.
    NotFound,
}

impl Route {
    /// Handler name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Hello => "hello",
            Route::Info => "info",
            Route::NotFound => "not_found",
        }
    }
}

/// Resolve a method/path pair to a route.
pub fn resolve(method: &Method, path: &str) -> Route {
    if method != Method::GET {
        return Route::NotFound;
    }
    match path {
        "/" | "/hello" => Route::Hello,
        "/info" => Route::Info,
        _ => Route::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_routes() {
        assert_eq!(resolve(&Method::GET, "/"), Route::Hello);
        assert_eq!(resolve(&Method::GET, "/hello"), Route::Hello);
    }

    #[test]
    fn test_info_route() {
        assert_eq!(resolve(&Method::GET, "/info"), Route::Info);
    }

    #[test]
    fn test_unknown_path() {
        assert_eq!(resolve(&Method::GET, "/missing"), Route::NotFound);
        assert_eq!(resolve(&Method::GET, "/hello/extra"), Route::NotFound);
    }

    #[test]
    fn test_route_names() {
        assert_eq!(resolve(&Method::GET, "/hello").name(), "hello");
        assert_eq!(resolve(&Method::GET, "/info").name(), "info");
        assert_eq!(resolve(&Method::GET, "/missing").name(), "not_found");
    }

    #[test]
    fn test_non_get_methods() {
        assert_eq!(resolve(&Method::POST, "/hello"), Route::NotFound);
        assert_eq!(resolve(&Method::DELETE, "/info"), Route::NotFound);
    }
}
