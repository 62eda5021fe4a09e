//! Log writer module
//!
//! Thread-safe line output to stdout, an append-mode file, or an in-memory
//! buffer.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Lines captured by a buffer target
pub type LogBuffer = Arc<Mutex<Vec<String>>>;

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to file
    File(Mutex<File>),
    /// Keep lines in memory
    Buffer(LogBuffer),
}

/// Thread-safe log writer
pub struct LogWriter {
    target: LogTarget,
}

impl LogWriter {
    pub const fn stdout() -> Self {
        Self {
            target: LogTarget::Stdout,
        }
    }

    /// Append to `path`, creating it and its parent directories as needed
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = open_log_file(path)?;
        Ok(Self {
            target: LogTarget::File(Mutex::new(file)),
        })
    }

    /// Writer that records lines in memory, plus a handle to read them
    pub fn buffer() -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        let writer = Self {
            target: LogTarget::Buffer(Arc::clone(&buffer)),
        };
        (writer, buffer)
    }

    pub fn write_line(&self, message: &str) {
        match &self.target {
            LogTarget::Stdout => {
                println!("{message}");
            }
            LogTarget::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
            LogTarget::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(message.to_string());
                }
            }
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
