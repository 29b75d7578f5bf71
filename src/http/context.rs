//! Handler invocation context and captured faults.
//!
//! # Responsibilities
//! - Bundle request, session, log sink and optional fault for a handler call
//! - Carry handler failures as values (`HandlerResult`) instead of unwinding
//!
//! # Design Decisions
//! - `HandlerFault` converts from any error type so handlers can use `?`
//! - A fault is only attached to the context on the error-reroute path
//! - Contexts are built per invocation and dropped when the handler returns

use std::fmt;
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::Response;
use crate::observability::logging::LogSink;
use crate::session::Session;

/// A failure raised while executing a route handler.
///
/// Any `std::error::Error + Send + Sync` converts into it with `?`;
/// `HandlerFault::msg` builds one from a plain message.
pub type HandlerFault = anyhow::Error;

/// What a route handler produces: a response, or a fault to reroute.
pub type HandlerResult = Result<Response, HandlerFault>;

/// The unit handed to a route handler.
pub struct RequestContext {
    request: Request,
    session: Arc<Session>,
    log: Option<LogSink>,
    fault: Option<HandlerFault>,
}

impl RequestContext {
    pub fn new(request: Request, session: Arc<Session>) -> Self {
        Self {
            request,
            session,
            log: None,
            fault: None,
        }
    }

    pub fn with_log(mut self, log: Option<LogSink>) -> Self {
        self.log = log;
        self
    }

    pub(crate) fn with_fault(mut self, fault: HandlerFault) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The fault that caused this error-route invocation, if any.
    pub fn fault(&self) -> Option<&HandlerFault> {
        self.fault.as_ref()
    }

    /// Forward a message to the configured log sink; no-op without one.
    pub fn log(&self, message: &str) {
        if let Some(log) = &self.log {
            log(message);
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request", &self.request)
            .field("session", &self.session)
            .field("log", &self.log.is_some())
            .field("fault", &self.fault)
            .finish()
    }
}
