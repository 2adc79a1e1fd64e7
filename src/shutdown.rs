use tokio_util::sync::CancellationToken;

/// Install a shutdown handler that listens for ctrl-c (and SIGTERM on unix).
///
/// Returns a `CancellationToken` that is cancelled when a signal arrives.
/// An embedding service typically awaits the token, then drains the worker
/// pool:
///
/// ```ignore
/// let token = shutdown_token();
/// token.cancelled().await;
/// pool.shutdown().await;
/// ```
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let handler = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        handler.cancel();
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Received ctrl-c, initiating graceful shutdown");
}
