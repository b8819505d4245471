//! Signal handling module
//!
//! SIGTERM and SIGINT (Ctrl+C) both trigger a graceful shutdown.

use tokio_util::sync::CancellationToken;

use crate::logger;

/// Cancel `shutdown` on the first SIGTERM or SIGINT
///
/// Handlers are registered before this returns, so a registration failure is
/// reported to the caller instead of inside the background task.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        logger::log_shutdown_requested(name);
        shutdown.cancel();
    });
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown_requested("Ctrl+C");
            shutdown.cancel();
        }
    });
    Ok(())
}
