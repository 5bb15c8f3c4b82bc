// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// How long in-flight connections get after shutdown is requested
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Accept loop for the brand server
///
/// Must run inside a `LocalSet`: every connection is a local task on the
/// single runtime thread.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (drain_tx, drain_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections, &drain_rx);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting, then ask open connections to close once idle
    drop(listener);
    drain_tx.send_replace(true);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));
    drain_connections(&active_connections, SHUTDOWN_GRACE).await;
    logger::log_shutdown_complete();
    Ok(())
}

/// Wait until no connection is active or the grace period ends.
///
/// Returns the number of connections still open at the end.
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            return 0;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {active} connection(s) still open"
            ));
            return active;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
