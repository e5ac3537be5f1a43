use anyhow::Result;
use tokio::signal;

/// Resolves on the first of Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<()> {
    let source = tokio::select! {
        result = ctrl_c() => result?,
        result = sigterm() => result?,
    };
    tracing::info!(signal = source, "Shutdown signal received");
    Ok(())
}

async fn ctrl_c() -> Result<&'static str> {
    signal::ctrl_c().await.inspect_err(|e| {
        tracing::error!(%e, "Error handling Ctrl+C signal");
    })?;
    Ok("SIGINT")
}

#[cfg(unix)]
async fn sigterm() -> Result<&'static str> {
    let mut handler = signal::unix::signal(signal::unix::SignalKind::terminate())
        .inspect_err(|e| tracing::error!(%e, "Failed to install SIGTERM handler"))?;
    handler.recv().await;
    Ok("SIGTERM")
}

#[cfg(not(unix))]
async fn sigterm() -> Result<&'static str> {
    std::future::pending().await
}
