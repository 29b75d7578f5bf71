//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler, dispatcher, router, session store
//!     → tracing events (structured fields: conn id, request id, peer)
//!
//! Route handlers
//!     → RequestContext::log
//!     → LogSink callback (wired to tracing by the binary)
//! ```
//!
//! # Design Decisions
//! - Structured logging (tracing) for everything the crate itself emits
//! - Handlers only see an opaque string sink

pub mod logging;

pub use logging::{init_tracing, tracing_sink, LogSink};
