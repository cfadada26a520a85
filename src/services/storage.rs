use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};

/// Flat directory of uploaded PDFs keyed by file name.
///
/// Same-name uploads overwrite each other; there is no locking or versioning.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn init(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!(storage_dir = %self.root.display(), "Upload storage ready");
        Ok(())
    }

    /// Resolves a client-supplied name inside the storage root. Only the final
    /// path component is kept; empty names and dot entries are rejected.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next()?;
        if base.is_empty() || base == "." || base == ".." {
            return None;
        }
        Some(self.root.join(base))
    }

    pub async fn save(&self, file_name: &str, content: &[u8]) -> AppResult<PathBuf> {
        let path = self
            .resolve(file_name)
            .ok_or_else(|| AppError::invalid_file(format!("Invalid file name: {}", file_name)))?;
        tokio::fs::write(&path, content).await?;
        debug!(path = %path.display(), bytes = content.len(), "Stored upload");
        Ok(path)
    }

    pub async fn load(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(file_name).ok_or(AppError::FileNotFound)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::FileNotFound),
            Err(e) => Err(e.into()),
        }
    }
}
