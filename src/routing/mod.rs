//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route source (startup)
//!     → route.rs (method, path template, handler)
//!     → matcher.rs (compile template to anchored pattern)
//!     → table.rs (store, last write wins per method + pattern)
//!
//! Incoming Request (method, path)
//!     → router.rs
//!     → table.rs (literal routes first, then parameterized)
//!     → handler | static fallback | 404
//!     → on handler fault: error path reroute (once) or DispatchError
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact, case-sensitive method comparison
//! - Explicit no-match (`None`) rather than a silent default

pub mod matcher;
pub mod route;
pub mod router;
pub mod table;

pub use matcher::{PathPattern, PatternError};
pub use route::{Handler, Route};
pub use router::{DispatchError, Router};
pub use table::RouteTable;
