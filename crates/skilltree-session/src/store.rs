//! Durable storage for the progress blob.
//!
//! A store only moves an opaque text blob; encoding and the lenient decode
//! live in [`codec`](crate::codec).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from reading or writing the progress blob.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("progress store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("progress encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the progress blob lives between sessions.
pub trait ProgressStore {
    /// Read the last saved blob. `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the saved blob.
    fn save(&mut self, blob: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Keeps the blob in a single file, creating parent directories on save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, blob)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// Keeps the blob in memory. Counts saves so callers can observe the
/// write-on-every-change behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            saves: 0,
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StoreError> {
        self.blob = Some(blob.to_string());
        self.saves += 1;
        Ok(())
    }
}
