//! Minimal HTTP dispatch layer.
//!
//! Routes requests to handlers by method and path pattern, decodes JSON and
//! form bodies into a value tree, keeps per-client sessions, reroutes handler
//! faults to an error path, falls back to static files, and processes
//! connections strictly one at a time.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod session;

// Collaborators
pub mod assets;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use http::{HandlerFault, HandlerResult, HttpServer, Request, RequestContext, Response, ServerState};
pub use lifecycle::Shutdown;
pub use routing::Route;
