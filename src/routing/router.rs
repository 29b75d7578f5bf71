//! Request dispatch: route lookup, static fallback and error rerouting.
//!
//! # Responsibilities
//! - Invoke the matched route's handler with a fresh `RequestContext`
//! - Fall back to static resources for unmatched file-shaped GET requests
//! - Answer other unmatched requests with 404
//! - Reroute a handler fault, once, to the configured error path
//!
//! # Design Decisions
//! - Handler success responses are returned untouched
//! - The error reroute is a GET to the error path reusing query, headers and body
//! - A fault raised by the error route itself is not intercepted again
//! - Without an error path, faults propagate to the caller as `DispatchError`

use std::sync::Arc;

use axum::http::StatusCode;

use crate::assets::{extension_of, StaticLookup, StaticResources};
use crate::http::context::{HandlerFault, RequestContext};
use crate::http::request::Request;
use crate::http::response::{Content, Response};
use crate::observability::LogSink;
use crate::routing::table::RouteTable;
use crate::session::Session;

/// A fault the router did not recover from.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unhandled handler fault: {0}")]
    Unhandled(HandlerFault),
}

/// Routes requests to handlers, static resources or the error path.
pub struct Router {
    table: RouteTable,
    statics: Option<Arc<dyn StaticResources>>,
    error_path: Option<String>,
    log: Option<LogSink>,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            statics: None,
            error_path: None,
            log: None,
        }
    }

    pub fn with_static_resources(mut self, statics: Arc<dyn StaticResources>) -> Self {
        self.statics = Some(statics);
        self
    }

    /// Path to reroute handler faults to. Leading/trailing `/` are trimmed.
    pub fn with_error_path(mut self, path: impl AsRef<str>) -> Self {
        self.error_path = Some(path.as_ref().trim_matches('/').to_string());
        self
    }

    pub fn with_log(mut self, log: LogSink) -> Self {
        self.log = Some(log);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn error_path(&self) -> Option<&str> {
        self.error_path.as_deref()
    }

    /// Route one request to its response.
    pub fn route(&self, mut request: Request, session: Arc<Session>) -> Result<Response, DispatchError> {
        let Some(route) = self.table.match_request(&mut request) else {
            if is_static_request(request.method(), request.path()) {
                return Ok(self.load_static(request.path()));
            }
            tracing::debug!(method = %request.method(), path = %request.path(), "No route matched");
            return Ok(Response::new(StatusCode::NOT_FOUND.as_u16()));
        };

        let ctx = RequestContext::new(request, Arc::clone(&session)).with_log(self.log.clone());
        let fault = match route.invoke(&ctx) {
            Ok(response) => return Ok(response),
            Err(fault) => fault,
        };

        let Some(error_path) = &self.error_path else {
            return Err(DispatchError::Unhandled(fault));
        };

        tracing::warn!(
            method = %ctx.request().method(),
            path = %ctx.request().path(),
            error = %fault,
            reroute = %error_path,
            "Handler fault, rerouting to error path"
        );

        let mut error_request = ctx.request().reroute(error_path);
        drop(ctx);

        let Some(error_route) = self.table.match_request(&mut error_request) else {
            return Ok(Response::redirect(error_path.as_str()));
        };

        let error_ctx = RequestContext::new(error_request, session)
            .with_log(self.log.clone())
            .with_fault(fault);

        error_route.invoke(&error_ctx).map_err(DispatchError::Unhandled)
    }

    fn load_static(&self, path: &str) -> Response {
        let Some(statics) = &self.statics else {
            return Response::new(StatusCode::NOT_FOUND.as_u16());
        };

        match statics.load(path) {
            StaticLookup::Found { data, content_type } => {
                Response::with_content(StatusCode::OK.as_u16(), Content::new(data, content_type))
            }
            StaticLookup::NotFound => Response::new(StatusCode::NOT_FOUND.as_u16()),
            StaticLookup::Unsupported => {
                tracing::warn!(path = %path, "Unsupported static resource type");
                Response::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
            }
        }
    }
}

/// A plain GET whose path is empty or whose last segment has a non-empty extension.
fn is_static_request(method: &str, path: &str) -> bool {
    if method != "GET" {
        return false;
    }
    path.trim().is_empty() || extension_of(path).is_some()
}
