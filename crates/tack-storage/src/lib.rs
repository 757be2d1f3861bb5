//! Persistence adapters for the tack board.
//!
//! Provides the [`PersistenceAdapter`] trait, a SQLite implementation
//! ([`SqliteAdapter`]) and an in-memory implementation with failure
//! injection ([`MemoryAdapter`]).

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::StorageError;
pub use memory::{AdapterCall, MemoryAdapter};
pub use sqlite::SqliteAdapter;
pub use traits::{PersistenceAdapter, TaskUpdates};

// ---------------------------------------------------------------------------
// PersistenceAdapter implementation for SqliteAdapter
// ---------------------------------------------------------------------------

use tack_core::task::{Task, TaskDraft, TaskId};

use crate::error::Result;

impl PersistenceAdapter for SqliteAdapter {
    fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        self.list_tasks_impl(project_id)
    }

    fn create_task(&self, project_id: &str, draft: &TaskDraft) -> Result<Task> {
        self.create_task_impl(project_id, draft)
    }

    fn update_task(&self, id: &str, updates: &TaskUpdates) -> Result<Task> {
        self.update_task_impl(id, updates)
    }

    fn update_tasks(&self, batch: &[(TaskId, TaskUpdates)]) -> Result<Vec<Task>> {
        self.update_tasks_impl(batch)
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        self.delete_task_impl(id)
    }
}
