use anyhow::Result;
use tokio::sync::broadcast;
use tracing::info;

/// Sends on `shutdown` once SIGTERM, SIGHUP or Ctrl-C is received.
#[cfg(unix)]
pub fn listen_for_shutdown(shutdown: broadcast::Sender<()>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::spawn(async move {
        let received = tokio::select! {
            _ = terminate.recv() => "SIGTERM",
            _ = hangup.recv() => "SIGHUP",
            _ = tokio::signal::ctrl_c() => "SIGINT",
        };
        info!(signal = received, "signal received, initiating shutdown");
        shutdown.send(()).ok();
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn listen_for_shutdown(shutdown: broadcast::Sender<()>) -> Result<()> {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received, initiating shutdown");
        shutdown.send(()).ok();
    });

    Ok(())
}
