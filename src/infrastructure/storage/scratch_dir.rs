//! Scratch directory audio store adapter

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{AudioStore, ScratchFile, StorageError};
use crate::domain::audio::AudioUpload;

/// Stores each upload as `<uuid>.<ext>` under one directory.
///
/// The random name is the only coordination between concurrent requests;
/// no two requests ever touch the same path.
#[derive(Debug, Clone)]
pub struct ScratchDirStore {
    dir: PathBuf,
}

impl ScratchDirStore {
    /// Create a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Scratch directory root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn fresh_path(&self, upload: &AudioUpload) -> PathBuf {
        self.dir.join(format!(
            "{}.{}",
            Uuid::new_v4(),
            upload.mime_type().extension()
        ))
    }
}

/// Who owns the file a blocking write produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    /// Write in flight
    Writing,
    /// Bytes on disk, not yet handed to a caller
    Written,
    /// Returned to the caller, who now owns release
    Claimed,
    /// `acquire` was dropped; whoever sees this last removes the file
    Abandoned,
}

/// Drop guard for one in-flight write.
///
/// The blocking writer and this guard settle ownership under one lock, so
/// a file is removed whether `acquire` is dropped before, during or after
/// the write finishes.
struct PendingWrite {
    path: PathBuf,
    state: Arc<Mutex<WriteState>>,
}

impl PendingWrite {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Arc::new(Mutex::new(WriteState::Writing)),
        }
    }

    fn shared_state(&self) -> Arc<Mutex<WriteState>> {
        Arc::clone(&self.state)
    }

    /// Hand the file to the caller
    fn claim(self) -> ScratchFile {
        *lock(&self.state) = WriteState::Claimed;
        ScratchFile::new(self.path.clone())
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        match *state {
            WriteState::Written => {
                remove_quietly(&self.path);
                debug!(path = %self.path.display(), "Removed upload of abandoned request");
                *state = WriteState::Abandoned;
            }
            WriteState::Writing => *state = WriteState::Abandoned,
            WriteState::Claimed | WriteState::Abandoned => {}
        }
    }
}

fn lock(state: &Mutex<WriteState>) -> MutexGuard<'_, WriteState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove scratch upload");
        }
    }
}

/// Runs on the blocking pool. Failed writes and writes nobody is waiting
/// for are removed here.
fn write_scratch(path: &Path, data: &[u8], state: &Mutex<WriteState>) -> std::io::Result<()> {
    let result = std::fs::write(path, data);
    let mut state = lock(state);
    match (&result, *state) {
        (Ok(()), WriteState::Writing) => *state = WriteState::Written,
        (Ok(()), WriteState::Abandoned) => {
            remove_quietly(path);
            debug!(path = %path.display(), "Removed upload finished after its request ended");
        }
        (Err(_), _) => remove_quietly(path),
        _ => {}
    }
    result
}

#[async_trait]
impl AudioStore for ScratchDirStore {
    async fn acquire(&self, upload: AudioUpload) -> Result<ScratchFile, StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::CreateDirFailed {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

        let path = self.fresh_path(&upload);
        let pending = PendingWrite::new(path.clone());
        let state = pending.shared_state();
        let target = path.clone();
        let data = upload.into_data();

        let written = tokio::task::spawn_blocking(move || write_scratch(&target, &data, &state))
            .await;

        let write_failed = |message: String| StorageError::WriteFailed {
            path: path.display().to_string(),
            message,
        };
        match written {
            Ok(Ok(())) => Ok(pending.claim()),
            Ok(Err(e)) => Err(write_failed(e.to_string())),
            Err(join) => {
                // The writer never reached its cleanup
                if let Err(e) = fs::remove_file(&path).await {
                    if e.kind() != ErrorKind::NotFound {
                        warn!(path = %path.display(), error = %e, "Failed to remove partial upload");
                    }
                }
                Err(write_failed(join.to_string()))
            }
        }
    }

    fn release(&self, file: &ScratchFile) -> Result<(), StorageError> {
        match std::fs::remove_file(file.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFailed {
                path: file.path().display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}
