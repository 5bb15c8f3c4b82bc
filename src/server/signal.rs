// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Start signal handlers (Unix only)
///
/// Registration happens before this returns, so a failure to install a
/// handler is reported to the caller. The first signal received stores a
/// permit in `shutdown`, which the accept loop consumes.
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGTERM | Graceful stop    |
/// | SIGINT  | Graceful stop    |
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        println!("\n[SIGNAL] {name} received, initiating graceful shutdown...");
        shutdown.notify_one();
    });
    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\n[SIGNAL] Ctrl+C received, initiating graceful shutdown...");
            shutdown.notify_one();
        }
    });
    Ok(())
}
