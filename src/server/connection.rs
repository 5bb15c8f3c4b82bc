// Connection handling module
// Serves one accepted TCP connection and writes its access log lines

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use hyper::body::{Body, Incoming};
use hyper::header::{HeaderValue, SERVER};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::http::HttpResponse;
use crate::logger::{self, AccessLogEntry};

/// Count the connection and serve it on a local task.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: &watch::Receiver<bool>,
) {
    let active = conn_counter.fetch_add(1, Ordering::SeqCst) + 1;
    logger::log_debug(&format!(
        "[Connection] Accepted from: {peer_addr} ({active} active)"
    ));

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown.clone(),
    );
}

/// Handle a single connection in a spawned task.
///
/// The task owns the stream until the client closes it (or keep-alive is off
/// and the response is written), then decrements the connection counter.
/// Once `shutdown` flips to true the connection finishes its in-flight
/// request and closes instead of waiting for the next one.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::task::spawn_local(async move {
        if let Err(e) = stream.set_nodelay(true) {
            logger::log_debug(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
        }
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.http.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| serve_request(req, peer_addr, Arc::clone(&state))),
        );
        tokio::pin!(conn);

        let mut draining = false;
        let result = loop {
            tokio::select! {
                result = conn.as_mut() => break result,
                _ = shutdown.wait_for(|stop| *stop), if !draining => {
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        };

        if let Err(err) = result {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run the router for one request, stamp the `Server` header and log access.
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let entry = state.config.logging.access_log.then(|| {
        AccessLogEntry::from_request(
            &peer_addr,
            req.method(),
            req.uri(),
            req.version(),
            req.headers(),
        )
    });

    let mut response = handler::handle_request(req, Arc::clone(&state)).await?;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}
