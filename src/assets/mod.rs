//! Static resource collaborator.
//!
//! # Data Flow
//! ```text
//! Unmatched GET with an empty path or a file extension
//!     → StaticResources::load(path)
//!     → media.rs (extension → MIME type)
//!     → files.rs (read from the static root)
//!     → Found { data, content_type } | NotFound | Unsupported
//! ```
//!
//! # Design Decisions
//! - The router only knows the `StaticResources` trait
//! - Unknown extensions are `Unsupported` (router answers 500), missing files `NotFound` (404)

pub mod files;
pub mod media;

use axum::body::Bytes;

pub use files::StaticFiles;
pub use media::extension_of;

/// Outcome of a static resource lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticLookup {
    Found { data: Bytes, content_type: String },
    NotFound,
    Unsupported,
}

/// Resolves a relative request path to static content.
pub trait StaticResources: Send + Sync {
    fn load(&self, path: &str) -> StaticLookup;
}
