//! Route descriptors supplied by the route source at startup.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::http::context::{HandlerFault, HandlerResult, RequestContext};

/// A route handler: context in, response or fault out.
pub type Handler = Arc<dyn Fn(&RequestContext) -> HandlerResult + Send + Sync>;

/// A `(method, path pattern, handler)` binding.
#[derive(Clone)]
pub struct Route {
    method: String,
    path: String,
    handler: Handler,
}

impl Route {
    /// Create a route. The path is stored with leading/trailing `/` trimmed.
    pub fn new<F>(method: impl Into<String>, path: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            method: method.into(),
            path: path.trim_matches('/').to_string(),
            handler: Arc::new(handler),
        }
    }

    pub fn get<F>(path: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new("GET", path, handler)
    }

    pub fn post<F>(path: &str, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> HandlerResult + Send + Sync + 'static,
    {
        Self::new("POST", path, handler)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The raw, uncompiled path pattern.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when the raw pattern contains a parameter token.
    pub fn is_parameterized(&self) -> bool {
        self.path.contains('{')
    }

    /// Run the handler. A panic is captured as a fault like any returned error.
    pub(crate) fn invoke(&self, ctx: &RequestContext) -> HandlerResult {
        match catch_unwind(AssertUnwindSafe(|| (self.handler)(ctx))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                Err(HandlerFault::msg(format!("handler panicked: {message}")))
            }
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Request;
    use crate::http::response::Response;
    use crate::session::SessionStore;
    use std::net::{IpAddr, Ipv4Addr};

    fn context() -> RequestContext {
        let store = SessionStore::default();
        RequestContext::new(
            Request::new("GET", "/"),
            store.get(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        )
    }

    #[test]
    fn path_is_trimmed() {
        let route = Route::get("/items/{id}/", |_| Ok(Response::new(200)));
        assert_eq!(route.path(), "items/{id}");
        assert_eq!(route.method(), "GET");
        assert!(route.is_parameterized());
        assert!(!Route::post("items", |_| Ok(Response::new(201))).is_parameterized());
    }

    #[test]
    fn panics_become_faults() {
        let route = Route::get("boom", |_| panic!("kaboom"));
        let fault = route.invoke(&context()).unwrap_err();
        assert_eq!(fault.to_string(), "handler panicked: kaboom");
    }
}
