// Application state module
// Everything a request handler needs, built once at startup

use super::types::Config;
use crate::logger::Logger;
use crate::storage::Storage;

/// Application state
///
/// Shared read-only behind an `Arc` by every connection task.
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
    pub logger: Logger,
}

impl AppState {
    pub fn new(config: Config, logger: Logger) -> Self {
        let storage = Storage::new(config.path.clone());
        Self {
            config,
            storage,
            logger,
        }
    }

    /// Body size cap in bytes, clamped to the address space
    pub fn size_limit(&self) -> usize {
        usize::try_from(self.config.size_limit_bytes()).unwrap_or(usize::MAX)
    }
}
