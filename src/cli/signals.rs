//! Shutdown signal handling for the server

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Resolve on SIGINT or SIGTERM, cancelling `token` first.
///
/// Passed to `axum::serve(..).with_graceful_shutdown`; the cancellation
/// unblocks requests still waiting on a model call.
pub async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        _ = interrupt() => {}
        _ = terminate() => {}
        _ = token.cancelled() => {}
    }

    token.cancel();
}

async fn interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(signal = "SIGINT", "Received shutdown signal"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
            info!(signal = "SIGTERM", "Received shutdown signal");
        }
        Err(e) => {
            error!(error = %e, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
