//! Termination signal handling.
//!
//! A signal cancels the shared token; the monitor drains and returns instead
//! of being killed mid-write.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Completes on SIGINT or SIGTERM (ctrl-c only on non-unix platforms).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received ctrl-c, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}

/// Spawn the signal listener; the token is cancelled when a signal arrives.
pub fn spawn_listener(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        shutdown_signal().await;
        cancel.cancel();
    })
}
