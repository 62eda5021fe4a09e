// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::logger::Logger;

/// Resolve once the process is asked to stop
#[cfg(unix)]
pub async fn shutdown_signal(logger: Logger) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            logger.warn("Failed to register SIGTERM handler", &[("error", &e)]);
            None
        }
    };

    let terminate = async {
        match sigterm.as_mut() {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            logger.info("SIGINT received, shutting down", &[]);
        }
        () = terminate => {
            logger.info("SIGTERM received, shutting down", &[]);
        }
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal(logger: Logger) {
    if let Ok(()) = tokio::signal::ctrl_c().await {
        logger.info("Ctrl+C received, shutting down", &[]);
    } else {
        std::future::pending::<()>().await;
    }
}
