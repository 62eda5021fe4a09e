//! Storage root access
//!
//! Every filesystem operation the server performs goes through [`Storage`].
//! Names are validated as single plain path components before they are
//! joined onto the root, so nothing outside the root is ever touched.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::StorageError;

/// Scratch file written and removed by [`Storage::self_test`]
pub const SELF_TEST_FILE: &str = "__TEST_FILE__";

type Result<T> = std::result::Result<T, StorageError>;

/// Directory entry as returned by [`Storage::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// Content and modification time of a stored file
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content: Vec<u8>,
    pub modified: Option<SystemTime>,
}

/// Metadata summary of the storage root, logged at startup in debug mode
#[derive(Debug, Clone)]
pub struct RootInfo {
    pub name: String,
    pub mode: String,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// The flat directory all files live in
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a client supplied name onto the root after validating it
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Create the root directory and any missing parents
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StorageError::io(format!("creating directory {}", self.root.display()), e)
        })
    }

    /// Entries of the root in directory read order
    pub async fn list(&self) -> Result<Vec<Entry>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| StorageError::io("reading directory", e))?;

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StorageError::io("reading directory", e))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    /// Read a stored file; anything that is not a regular file is `NotFound`
    pub async fn read(&self, name: &str) -> Result<StoredFile> {
        let path = self.resolve(name)?;
        self.check_link(name, &path).await?;

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => return Err(StorageError::io("reading metadata", e)),
        };
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        let content = match fs::read(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => return Err(StorageError::io("reading file", e)),
        };

        Ok(StoredFile {
            content,
            modified: metadata.modified().ok(),
        })
    }

    /// Create or truncate `name` and write `content` in full
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.resolve(name)?;
        self.check_link(name, &path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::io("opening file", e))?;

        file.write_all(content)
            .await
            .map_err(|e| StorageError::io("writing to file", e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io("writing to file", e))?;
        Ok(())
    }

    /// Remove `name`, recursively when it is a directory
    ///
    /// Returns whether anything was removed. A missing entry is not an error.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.resolve(name)?;

        let metadata = match fs::symlink_metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(StorageError::io("failed to delete file", e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match result {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io("failed to delete file", e)),
        }
    }

    /// Refuse a symlink whose target is outside the root or missing
    ///
    /// Removal never follows links, so only reads and writes need this.
    async fn check_link(&self, name: &str, path: &Path) -> Result<()> {
        match fs::symlink_metadata(path).await {
            Ok(m) if m.file_type().is_symlink() => {}
            _ => return Ok(()),
        }

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|e| StorageError::io("resolving storage directory", e))?;
        match fs::canonicalize(path).await {
            Ok(target) if target.starts_with(&root) => Ok(()),
            _ => Err(StorageError::InvalidName(name.to_string())),
        }
    }

    /// Prove the root is writable by writing and removing a scratch file
    pub async fn self_test(&self) -> Result<()> {
        self.write(SELF_TEST_FILE, b"test").await?;
        self.remove(SELF_TEST_FILE).await?;
        Ok(())
    }

    pub async fn describe(&self) -> Result<RootInfo> {
        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|e| StorageError::io("reading storage directory", e))?;

        let name = self
            .root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned());

        Ok(RootInfo {
            name,
            mode: format_mode(&metadata),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Accept only a single normal path component
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(StorageError::InvalidName(name.to_string()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StorageError::InvalidName(name.to_string())),
    }
}

/// `ls -l` style mode string, e.g. `drwxr-xr-x`
#[cfg(unix)]
fn format_mode(metadata: &std::fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode();
    let mut out = String::with_capacity(10);
    out.push(if metadata.is_dir() { 'd' } else { '-' });
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn format_mode(metadata: &std::fs::Metadata) -> String {
    let kind = if metadata.is_dir() { 'd' } else { '-' };
    let access = if metadata.permissions().readonly() { "r" } else { "rw" };
    format!("{kind}{access}")
}
