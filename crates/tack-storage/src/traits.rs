//! The persistence boundary of the board.
//!
//! The board engine depends on this trait rather than on a concrete backend,
//! so the SQLite store, the in-memory adapter and any remote backend are
//! interchangeable.

use tack_core::task::{Task, TaskDraft, TaskId};

use crate::error::Result;

pub use tack_core::task::TaskUpdates;

/// Backend that owns the durable copy of a project's tasks.
///
/// Every call may fail with a typed [`StorageError`](crate::StorageError).
pub trait PersistenceAdapter: Send + Sync {
    /// Returns every task of a project, in creation order.
    fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>>;

    /// Creates a task from a draft. The adapter issues the id.
    fn create_task(&self, project_id: &str, draft: &TaskDraft) -> Result<Task>;

    /// Applies a partial update and returns the stored task.
    fn update_task(&self, id: &str, updates: &TaskUpdates) -> Result<Task>;

    /// Applies a batch of updates. Either every update is stored or none is.
    fn update_tasks(&self, batch: &[(TaskId, TaskUpdates)]) -> Result<Vec<Task>>;

    fn delete_task(&self, id: &str) -> Result<()>;
}
