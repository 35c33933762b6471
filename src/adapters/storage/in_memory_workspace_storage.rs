//! In-Memory Workspace Storage Adapter
//!
//! Keeps the last saved document store in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::workspace::DocumentStore;
use crate::ports::{WorkspaceStorage, WorkspaceStorageError};

/// In-memory storage for the client workspace
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceStorage {
    saved: Arc<RwLock<Option<DocumentStore>>>,
}

impl InMemoryWorkspaceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the saved workspace (useful for tests)
    pub async fn clear(&self) {
        *self.saved.write().await = None;
    }

    pub async fn has_saved(&self) -> bool {
        self.saved.read().await.is_some()
    }
}

#[async_trait]
impl WorkspaceStorage for InMemoryWorkspaceStorage {
    async fn save(&self, store: &DocumentStore) -> Result<(), WorkspaceStorageError> {
        *self.saved.write().await = Some(store.clone());
        Ok(())
    }

    async fn load(&self) -> Result<DocumentStore, WorkspaceStorageError> {
        self.saved
            .read()
            .await
            .clone()
            .ok_or(WorkspaceStorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DocumentId;
    use crate::domain::workspace::DocumentRow;

    #[tokio::test]
    async fn round_trips_and_clears() {
        let storage = InMemoryWorkspaceStorage::new();
        assert!(matches!(
            storage.load().await,
            Err(WorkspaceStorageError::NotFound)
        ));

        let mut store = DocumentStore::new();
        store.insert(DocumentRow::uploaded(DocumentId::new(), "prd.pdf", 10));
        storage.save(&store).await.unwrap();

        assert!(storage.has_saved().await);
        assert_eq!(storage.load().await.unwrap(), store);

        storage.clear().await;
        assert!(!storage.has_saved().await);
    }
}
