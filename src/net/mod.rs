//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (permit gate, accept)
//!     → connection.rs (id, peer address, stream)
//!     → Hand off to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Optional counting gate in front of `accept`
//! - Each connection gets an id for log correlation
//! - Plain TCP only

pub mod connection;
pub mod listener;

pub use connection::{Connection, ConnectionId};
pub use listener::{Listener, ListenerError};
