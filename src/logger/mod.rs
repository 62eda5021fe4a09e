//! Logger module
//!
//! Leveled structured logging for the server:
//! - Server lifecycle logging
//! - Per-request debug records carrying method and path
//! - Error and warning logging
//!
//! The logger is a plain value stored in `AppState`; request fields are
//! passed explicitly at each call.

mod format;
mod value;
pub mod writer;

pub use format::{LogFormat, LogRecord};
pub use value::LogValue;
pub use writer::{LogBuffer, LogWriter};

use chrono::Local;
use std::fmt::{self, Display};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::storage::RootInfo;

/// Value of the `name` field attached to every record
const LOGGER_NAME: &str = "globd";

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Cheaply clonable logger handle
#[derive(Clone)]
pub struct Logger {
    min_level: Level,
    format: LogFormat,
    writer: Arc<LogWriter>,
}

impl Logger {
    pub fn new(min_level: Level, format: LogFormat, writer: LogWriter) -> Self {
        Self {
            min_level,
            format,
            writer: Arc::new(writer),
        }
    }

    /// Build the logger described by the configuration
    ///
    /// Debug mode logs everything as text; otherwise INFO and above as JSON.
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        let writer = match &config.log_file {
            Some(path) => LogWriter::file(path)?,
            None => LogWriter::stdout(),
        };
        let (level, format) = if config.debug {
            (Level::Debug, LogFormat::Text)
        } else {
            (Level::Info, LogFormat::Json)
        };
        Ok(Self::new(level, format, writer))
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: Level, message: &str, fields: &[(&str, &dyn LogValue)]) {
        if !self.enabled(level) {
            return;
        }

        let mut all: Vec<(&str, &dyn LogValue)> = Vec::with_capacity(fields.len() + 1);
        all.push(("name", &LOGGER_NAME));
        all.extend_from_slice(fields);

        let record = LogRecord {
            time: Local::now(),
            level,
            message,
            fields: &all,
        };
        self.writer.write_line(&record.format(self.format));
    }

    pub fn debug(&self, message: &str, fields: &[(&str, &dyn LogValue)]) {
        self.log(Level::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: &[(&str, &dyn LogValue)]) {
        self.log(Level::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: &[(&str, &dyn LogValue)]) {
        self.log(Level::Warn, message, fields);
    }

    pub fn error(&self, message: &str, fields: &[(&str, &dyn LogValue)]) {
        self.log(Level::Error, message, fields);
    }

    pub fn server_start(&self, addr: &SocketAddr, config: &Config) {
        let path = config.path.display();
        let limit = config.size_limit_bytes();
        self.info(
            &format!("Listening on: http://{addr}"),
            &[("storage", &path), ("size_limit_bytes", &limit)],
        );
        if let Some(workers) = config.workers {
            self.debug("Worker threads", &[("workers", &workers)]);
        }
        if let Some(log_file) = &config.log_file {
            self.debug("Log file", &[("path", &log_file.display())]);
        }
    }

    pub fn storage_root(&self, info: &RootInfo) {
        let modified = info
            .modified
            .map(|t| chrono::DateTime::<Local>::from(t).to_rfc3339())
            .unwrap_or_default();
        self.debug(
            "Storage directory",
            &[
                ("mode", &info.mode),
                ("size", &info.size),
                ("modTime", &modified),
                ("dir", &info.name),
            ],
        );
    }

    pub fn connection_error(&self, err: &impl fmt::Debug) {
        self.error("Failed to serve connection", &[("error", &format!("{err:?}"))]);
    }
}
