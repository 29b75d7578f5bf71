//! Per-request pipeline: decode body, resolve session, route, serialize.
//!
//! # Responsibilities
//! - Collect and decode the request body
//! - Resolve the client's session by peer IP
//! - Route through the `Router` and convert the outcome to an HTTP response
//! - Turn unrecovered faults into a bare 500 for that request only
//!
//! # Design Decisions
//! - Request ID taken from `x-request-id` when present, otherwise a UUID v4
//! - The request ID is echoed on every response
//! - Unrecovered faults are logged, never propagated past this point

use std::net::{IpAddr, SocketAddr};

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};

use crate::http::body::{parse_body, BodyError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::observability::LogSink;
use crate::routing::{DispatchError, Router};
use crate::session::SessionStore;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Drives one request through body decoding, session lookup and routing.
pub struct Dispatcher {
    router: Router,
    sessions: SessionStore,
    log: Option<LogSink>,
}

impl Dispatcher {
    pub fn new(router: Router, sessions: SessionStore) -> Self {
        Self {
            router,
            sessions,
            log: None,
        }
    }

    /// Sink receiving one line per request.
    pub fn with_log(mut self, log: Option<LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle a request read off a connection from `peer`.
    pub async fn handle<B>(&self, peer: SocketAddr, request: axum::http::Request<B>) -> axum::http::Response<Body>
    where
        B: axum::body::HttpBody<Data = axum::body::Bytes> + Send + 'static,
        B::Error: Into<axum::BoxError>,
    {
        let (parts, body) = request.into_parts();
        let request_id = request_id(&parts);

        let mut response = match axum::body::to_bytes(Body::new(body), usize::MAX).await {
            Ok(bytes) => self.dispatch(peer.ip(), &parts, &bytes, &request_id).into_http(),
            Err(e) => {
                tracing::warn!(request_id = %request_id, peer = %peer, error = %e, "Failed to read request body");
                Response::new(StatusCode::BAD_REQUEST.as_u16()).into_http()
            }
        };

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }
        response
    }

    /// Run the pipeline on an already collected body.
    pub fn dispatch(&self, peer: IpAddr, parts: &Parts, raw_body: &[u8], request_id: &str) -> Response {
        if let Some(log) = &self.log {
            log(&format!("{} - {} {}", peer, parts.method, parts.uri));
        }

        tracing::debug!(
            request_id = %request_id,
            peer = %peer,
            method = %parts.method,
            path = %parts.uri.path(),
            "Dispatching request"
        );

        let body = match decode_body(parts, raw_body) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Request body rejected");
                return Response::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            }
        };

        let session = self.sessions.get(peer);
        let request = Request::from_parts(parts, body);

        match self.router.route(request, session) {
            Ok(response) => response,
            Err(DispatchError::Unhandled(fault)) => {
                tracing::error!(request_id = %request_id, error = %fault, "Unhandled handler fault");
                Response::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
            }
        }
    }
}

fn decode_body(parts: &Parts, raw_body: &[u8]) -> Result<crate::http::body::BodyMap, BodyError> {
    let text = std::str::from_utf8(raw_body).map_err(|e| BodyError::Encoding(e.to_string()))?;
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    parse_body(text, content_type)
}

fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
