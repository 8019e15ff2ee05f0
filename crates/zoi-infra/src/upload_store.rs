//! Working-directory storage for uploaded images
//!
//! An upload lives on disk only while a detector needs it. [`StoredUpload`]
//! removes its file on [`StoredUpload::discard`] or, failing that, on drop, so
//! no exit path of a request leaves the file behind.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;
use zoi_types::NamingStrategy;

const FALLBACK_NAME: &str = "upload";

/// Directory uploads are written into
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    naming: NamingStrategy,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, naming: NamingStrategy) -> Self {
        Self {
            dir: dir.into(),
            naming,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn naming(&self) -> NamingStrategy {
        self.naming
    }

    /// On-disk path for a declared filename.
    ///
    /// Only the last path component of `declared` is used.
    pub fn path_for(&self, declared: &str) -> PathBuf {
        let file_name = Path::new(declared)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(FALLBACK_NAME);

        match self.naming {
            NamingStrategy::Declared => self.dir.join(file_name),
            NamingStrategy::Unique => {
                let stem = Uuid::new_v4().to_string();
                match Path::new(file_name).extension().and_then(|e| e.to_str()) {
                    Some(ext) => self.dir.join(format!("{}.{}", stem, ext)),
                    None => self.dir.join(stem),
                }
            }
        }
    }

    /// Write `bytes` under `declared`, creating the directory if needed
    pub async fn persist(&self, declared: &str, bytes: &[u8]) -> io::Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(declared);
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }

        Ok(StoredUpload {
            path,
            removed: false,
        })
    }
}

/// An upload written to the working directory
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    removed: bool,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now
    pub async fn discard(mut self) -> io::Result<()> {
        self.removed = true;
        tokio::fs::remove_file(&self.path).await
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove upload {}: {}", self.path.display(), e);
            }
        }
    }
}
