use std::process::ExitCode;
use std::sync::Arc;

use globd::config::{AppState, Config};
use globd::logger::Logger;
use globd::server;

fn main() -> ExitCode {
    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let logger = match Logger::from_config(&cfg) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Unable to open log file: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(runtime) => runtime,
        Err(e) => {
            logger.error("Unable to start runtime", &[("error", &e)]);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(cfg, logger.clone())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.error(&e.to_string(), &[]);
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cfg: Config, logger: Logger) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let state = Arc::new(AppState::new(cfg, logger.clone()));

    server::bootstrap_storage(&state).await.map_err(|e| {
        format!(
            "Unable to prepare storage directory {}: {e}",
            state.config.path.display()
        )
    })?;

    let listener =
        server::create_listener(addr).map_err(|e| format!("Unable to bind {addr}: {e}"))?;
    logger.server_start(&addr, &state.config);

    server::serve(listener, state, server::shutdown_signal(logger)).await;
    Ok(())
}
