// Server module entry
// Storage bootstrap, the accept loop and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::config::AppState;
use crate::error::StorageError;

// Re-export commonly used items
pub use listener::create_listener;
pub use signal::shutdown_signal;

/// How long in-flight connections get to finish after shutdown starts
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Make sure the storage root exists and, in debug mode, that it is writable
///
/// The server must not start when this fails.
pub async fn bootstrap_storage(state: &AppState) -> Result<(), StorageError> {
    state.storage.ensure_root().await?;

    if state.config.debug {
        let info = state.storage.describe().await?;
        state.logger.storage_root(&info);
        state.storage.self_test().await?;
    }
    Ok(())
}

/// Accept connections until `shutdown` resolves, then drain
///
/// Each connection is served on its own task; after shutdown the listener
/// is closed and open connections get [`DRAIN_TIMEOUT`] to complete.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let active_connections = Arc::new(AtomicUsize::new(0));
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        state.logger.debug("Connection accepted", &[("peer", &peer_addr)]);
                        connection::handle_connection(
                            stream,
                            Arc::clone(&state),
                            &active_connections,
                            shutdown_rx.clone(),
                        );
                    }
                    Err(e) => {
                        state.logger.error("Failed to accept connection", &[("error", &e)]);
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    let _ = shutdown_tx.send(true);

    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active_connections.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }

    let remaining = active_connections.load(Ordering::SeqCst);
    if remaining > 0 {
        state
            .logger
            .warn("Shutdown with connections still open", &[("connections", &remaining)]);
    }
    state.logger.info("Server stopped", &[]);
}
