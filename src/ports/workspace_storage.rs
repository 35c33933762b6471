//! Workspace Storage Port - Persisting the client's document store.

use async_trait::async_trait;

use crate::domain::workspace::DocumentStore;

/// Errors that can occur during workspace storage operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceStorageError {
    #[error("No saved workspace found")]
    NotFound,

    #[error("Failed to serialize workspace: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize workspace: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for saving and loading the whole document store.
#[async_trait]
pub trait WorkspaceStorage: Send + Sync {
    /// Replaces any previously saved workspace.
    async fn save(&self, store: &DocumentStore) -> Result<(), WorkspaceStorageError>;

    /// # Errors
    /// Returns `WorkspaceStorageError::NotFound` if nothing was saved yet
    async fn load(&self) -> Result<DocumentStore, WorkspaceStorageError>;
}
