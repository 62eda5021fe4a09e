// Configuration module entry point
// Loads the startup configuration and holds the shared application state

mod state;
mod types;

use ::config::{ConfigError, Environment, File};
use std::collections::HashMap;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Config file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "globd";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_VAR: &str = "GLOBD_CONFIG";

/// Plain environment variables that map straight onto config keys
const UNPREFIXED_VARS: [(&str, &str); 2] = [("port", "PORT"), ("size_limit_mb", "SIZE_LIMIT_MB")];

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let config_path = vars
            .get(CONFIG_PATH_VAR)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&config_path, vars)
    }

    /// Load configuration from a config file (optional) and a set of variables
    ///
    /// Precedence, lowest first: defaults, file, `GLOB_*` variables,
    /// then `PORT`, `SIZE_LIMIT_MB` and `DEBUG`.
    pub fn load_from(config_path: &str, vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("GLOB")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .set_default("path", "./globs")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("size_limit_mb", 10)?
            .set_default("debug", false)?
            .set_default("header_read_timeout", 5)?;

        for (key, var) in UNPREFIXED_VARS {
            let value = vars.get(var).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(key, value)?;
        }
        builder = builder.set_override_option("debug", vars.get("DEBUG").and_then(|v| debug_flag(v)))?;

        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Interpret `DEBUG`: unset or empty means off, explicit negatives mean off,
/// anything else turns debug mode on
fn debug_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let off = ["0", "false", "no", "off"]
        .iter()
        .any(|n| value.eq_ignore_ascii_case(n));
    Some(!off)
}
