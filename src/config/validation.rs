//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the bind address, connection limit and log level
//! - Check that the static root exists
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the listener is bound

use std::path::PathBuf;

use crate::config::schema::ServerConfig;

/// A single failed configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("max_connections must not be negative (got {0})")]
    NegativeConnectionLimit(i64),

    #[error("static root {} is not an existing directory", .0.display())]
    MissingStaticRoot(PathBuf),

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

/// Check every rule and collect all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.socket_addr().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(limit) = config.listener.max_connections {
        if limit < 0 {
            errors.push(ValidationError::NegativeConnectionLimit(limit));
        }
    }

    if let Some(root) = &config.static_files.root {
        if !root.is_dir() {
            errors.push(ValidationError::MissingStaticRoot(root.clone()));
        }
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
