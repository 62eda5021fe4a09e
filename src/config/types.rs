// Configuration types module
// Defines the startup configuration structure

use serde::Deserialize;
use std::path::PathBuf;

/// Bytes per megabyte unit used by `size_limit_mb`
const MIB_SHIFT: u32 = 20;

/// Main configuration structure
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Storage root directory
    pub path: PathBuf,
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Maximum request body size in MiB
    pub size_limit_mb: u64,
    /// Verbose text logging plus a storage self-test at startup
    pub debug: bool,
    /// Tokio worker threads (CPU cores when unset)
    #[serde(default)]
    pub workers: Option<usize>,
    /// Seconds allowed for a client to send request headers
    pub header_read_timeout: u64,
    /// Append log records to this file instead of stdout
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Body size cap in bytes
    pub const fn size_limit_bytes(&self) -> u64 {
        self.size_limit_mb.saturating_mul(1 << MIB_SHIFT)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".").join("globs"),
            host: "0.0.0.0".to_string(),
            port: 3000,
            size_limit_mb: 10,
            debug: false,
            workers: None,
            header_read_timeout: 5,
            log_file: None,
        }
    }
}
