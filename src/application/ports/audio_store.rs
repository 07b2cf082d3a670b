//! Temporary audio storage port

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioUpload;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to create scratch directory {path}: {message}")]
    CreateDirFailed { path: String, message: String },

    #[error("Failed to write audio file {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to remove audio file {path}: {message}")]
    RemoveFailed { path: String, message: String },
}

/// Handle to one stored upload. Only the store that created it may release it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Port for per-request audio scratch files
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Persist the upload under a fresh, collision-free name.
    ///
    /// On failure nothing is left behind. Cancellation-safe: if the future
    /// is dropped before it resolves, any file it wrote is removed.
    async fn acquire(&self, upload: AudioUpload) -> Result<ScratchFile, StorageError>;

    /// Delete the file if it still exists.
    ///
    /// Idempotent: a missing file is success. Synchronous so it can run
    /// from `Drop` when a request future is abandoned.
    fn release(&self, file: &ScratchFile) -> Result<(), StorageError>;
}
