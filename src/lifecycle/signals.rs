//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Wait for Ctrl-C, then trigger `shutdown`.
///
/// A second Ctrl-C exits the process immediately.
pub async fn watch_ctrl_c(shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Ctrl-C received, shutting down");
    shutdown.trigger();

    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Second Ctrl-C, exiting immediately");
        std::process::exit(130);
    }
}
