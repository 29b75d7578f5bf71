//! OS signal handling.
//!
//! Ctrl+C (SIGINT) triggers shutdown. A second signal is not handled
//! specially: the accept loop has already stopped by then.

use crate::lifecycle::shutdown::Shutdown;

/// Spawn a task that triggers `shutdown` on Ctrl+C.
pub fn shutdown_on_ctrl_c(shutdown: Shutdown) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for interrupt signal");
            }
        }
    })
}
