//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection
//!     → server.rs (HTTP/1.1, one request per connection, served inline)
//!     → dispatch.rs (collect body, request ID, session lookup)
//!     → body.rs (decode JSON / form body into a value tree)
//!     → request.rs (method, path, query, headers, body)
//!     → [routing layer picks handler, static file or error path]
//!     → response.rs (status, content, redirect → wire response)
//! ```

pub mod body;
pub mod context;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use body::{parse_body, BodyError, BodyMap, Value};
pub use context::{HandlerFault, HandlerResult, RequestContext};
pub use dispatch::{Dispatcher, X_REQUEST_ID};
pub use request::{FieldMap, Request};
pub use response::{Content, Response};
pub use server::{HttpServer, ServerState};
