//! File-based Workspace Storage Adapter
//!
//! Stores the whole document store as one pretty-printed JSON file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::workspace::DocumentStore;
use crate::ports::{WorkspaceStorage, WorkspaceStorageError};

/// File-based storage for the client workspace
#[derive(Debug, Clone)]
pub struct FileWorkspaceStorage {
    file_path: PathBuf,
}

impl FileWorkspaceStorage {
    /// Create a storage that reads and writes `file_path`
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileWorkspaceStorage::new("./data/workspace.json");
    /// ```
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Ensure the parent directory exists
    async fn ensure_parent_dir(&self) -> Result<(), WorkspaceStorageError> {
        match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| WorkspaceStorageError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl WorkspaceStorage for FileWorkspaceStorage {
    async fn save(&self, store: &DocumentStore) -> Result<(), WorkspaceStorageError> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(store)
            .map_err(|e| WorkspaceStorageError::SerializationFailed(e.to_string()))?;

        // Write beside the target, then rename over it
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| WorkspaceStorageError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &self.file_path)
            .await
            .map_err(|e| WorkspaceStorageError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.file_path.display(), rows = store.len(), "workspace saved");
        Ok(())
    }

    async fn load(&self) -> Result<DocumentStore, WorkspaceStorageError> {
        let json = match fs::read_to_string(&self.file_path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WorkspaceStorageError::NotFound);
            }
            Err(e) => return Err(WorkspaceStorageError::IoError(e.to_string())),
        };

        serde_json::from_str(&json)
            .map_err(|e| WorkspaceStorageError::DeserializationFailed(e.to_string()))
    }
}
