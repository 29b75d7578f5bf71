//! Directory-backed static files.

use std::path::{Component, Path, PathBuf};

use super::media::{content_type_for, extension_of, DEFAULT_CONTENT_TYPE};
use super::{StaticLookup, StaticResources};

const INDEX_FILE: &str = "index.html";

/// Serves files below a root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StaticResources for StaticFiles {
    fn load(&self, path: &str) -> StaticLookup {
        let path = path.trim().trim_matches('/');
        let path = if path.is_empty() { INDEX_FILE } else { path };
        let relative = Path::new(path);

        // Only plain components may appear; anything else could leave the root
        if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            tracing::debug!(path = %relative.display(), "Rejected static path outside root");
            return StaticLookup::NotFound;
        }

        let content_type = match extension_of(path) {
            Some(ext) => match content_type_for(ext) {
                Some(ct) => ct,
                None => return StaticLookup::Unsupported,
            },
            None => DEFAULT_CONTENT_TYPE,
        };

        let absolute = self.root.join(relative);
        if !absolute.is_file() {
            return StaticLookup::NotFound;
        }

        match std::fs::read(&absolute) {
            Ok(data) => StaticLookup::Found {
                data: data.into(),
                content_type: content_type.to_string(),
            },
            Err(e) => {
                tracing::warn!(path = %absolute.display(), error = %e, "Failed to read static file");
                StaticLookup::NotFound
            }
        }
    }
}
