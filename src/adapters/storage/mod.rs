//! Storage Adapters
//!
//! Implementations of the WorkspaceStorage port for persisting the client's
//! document store.
//!
//! ## Available Adapters
//!
//! - **FileWorkspaceStorage** - One JSON file on disk
//! - **InMemoryWorkspaceStorage** - Memory only (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileWorkspaceStorage, InMemoryWorkspaceStorage};
//!
//! // Production: file-based storage
//! let storage = FileWorkspaceStorage::new("./data/workspace.json");
//!
//! // Testing: in-memory storage
//! let storage = InMemoryWorkspaceStorage::new();
//! ```

mod file_workspace_storage;
mod in_memory_workspace_storage;

pub use file_workspace_storage::FileWorkspaceStorage;
pub use in_memory_workspace_storage::InMemoryWorkspaceStorage;
