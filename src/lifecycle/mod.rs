//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Compile routes → Assemble dispatcher
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Accept loop stops waiting → Server reports Stopped
//!
//! Signals (signals.rs):
//!     SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then routes, listener last
//! - Shutdown never cancels an in-flight request and drains nothing

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::shutdown_on_ctrl_c;
pub use startup::{build_dispatcher, StartupError};
