// Connection handling module
// Serves one TCP connection per spawned task

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;

/// Smallest read buffer hyper accepts
const MIN_BUF_SIZE: usize = 8192;

/// Decrements the active connection counter when the task ends, however it ends
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle a single connection in a spawned task.
///
/// HTTP/1.1 with keep-alive. Clients get `header_read_timeout` seconds to
/// send request headers; bodies are bounded by size only. Request headers
/// may be as large as the body size limit. When `shutdown` flips, the
/// connection finishes its current request and closes.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    active_connections: &Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    active_connections.fetch_add(1, Ordering::SeqCst);
    let guard = ConnectionGuard(Arc::clone(active_connections));

    tokio::spawn(async move {
        let _guard = guard;
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(true)
            .timer(TokioTimer::new())
            .header_read_timeout(Duration::from_secs(state.config.header_read_timeout))
            .max_buf_size(state.size_limit().max(MIN_BUF_SIZE));

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state))),
        );
        tokio::pin!(conn);

        let result = tokio::select! {
            res = conn.as_mut() => res,
            _ = shutdown.changed() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        };

        if let Err(err) = result {
            // Slow or vanished clients are routine
            if err.is_timeout() || err.is_incomplete_message() || err.is_closed() {
                state
                    .logger
                    .debug("Connection closed", &[("reason", &err)]);
            } else {
                state.logger.connection_error(&err);
            }
        }
    });
}
