//! Per-client session continuity.
//!
//! # Data Flow
//! ```text
//! Accepted connection (peer IP)
//!     → store.rs (lookup by address, lazy expiry check)
//!     → existing Session, or a fresh empty one replacing the expired entry
//!     → shared with the handler through RequestContext
//! ```
//!
//! # Design Decisions
//! - Keyed by client IP only; every port from one address shares a session
//! - Expiry is detected on access; there is no background sweep
//! - Plain lookups do not refresh the last-activity timestamp
//! - The map is a `DashMap` and each session guards its values with a mutex,
//!   so the store stays sound if requests are ever dispatched in parallel

pub mod store;

pub use store::{Session, SessionStore, DEFAULT_SESSION_DURATION};
