//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binary
//! - Define the opaque log sink handed to route handlers
//! - Provide a sink that forwards into tracing
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level comes from `RUST_LOG`, falling back to the configured level
//! - The sink is a plain string callback so handlers stay decoupled from tracing

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A single-string log callback. Absence means no-op.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(default_level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let fallback = format!("relay_dispatch={default_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// A log sink that emits each line as an `info` event.
pub fn tracing_sink() -> LogSink {
    Arc::new(|message: &str| {
        tracing::info!(target: "relay_dispatch::app", "{}", message);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_accepts_lines_without_subscriber() {
        let sink = tracing_sink();
        sink("no subscriber installed");
    }
}
