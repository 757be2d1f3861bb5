//! In-memory [`PersistenceAdapter`] with failure injection.
//!
//! Backs the board's unit tests and any embedding that does not need a
//! durable store. Failures can be injected for the next N calls or for
//! calls touching a given task id.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use tack_core::task::{Task, TaskDraft, TaskId};
use tack_core::validation::{validate_draft, validate_updates};

use crate::error::{Result, StorageError};
use crate::traits::{PersistenceAdapter, TaskUpdates};

/// One recorded call against a [`MemoryAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    ListTasks(String),
    CreateTask(String),
    UpdateTask(TaskId),
    UpdateTasks(Vec<TaskId>),
    DeleteTask(TaskId),
}

#[derive(Debug, Default)]
struct MemoryState {
    tasks: Vec<(String, Task)>,
    next_seq: u64,
    fail_next: usize,
    fail_on: HashSet<TaskId>,
    calls: Vec<AdapterCall>,
}

impl MemoryState {
    fn check_injected(&mut self, ids: &[&str]) -> Result<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(StorageError::Connection("injected failure".into()));
        }
        if let Some(id) = ids.iter().find(|id| self.fail_on.contains(**id)) {
            return Err(StorageError::Connection(format!("injected failure for {id}")));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|(_, t)| t.id == id)
            .ok_or_else(|| StorageError::not_found("task", id))
    }
}

/// A [`PersistenceAdapter`] that keeps tasks in a `Vec` behind a `Mutex`.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    state: Mutex<MemoryState>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// An adapter pre-loaded with `tasks` under `project_id`.
    pub fn with_tasks(project_id: &str, tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks: Vec<(String, Task)> = tasks
            .into_iter()
            .map(|t| (project_id.to_string(), t))
            .collect();
        let next_seq = tasks.len() as u64;
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                next_seq,
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))
    }

    /// Makes the next `n` calls fail with a retryable error.
    pub fn fail_next(&self, n: usize) {
        if let Ok(mut state) = self.lock() {
            state.fail_next = n;
        }
    }

    /// Makes every call that touches `id` fail until [`clear_failures`](Self::clear_failures).
    pub fn fail_on(&self, id: impl Into<TaskId>) {
        if let Ok(mut state) = self.lock() {
            state.fail_on.insert(id.into());
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.lock() {
            state.fail_next = 0;
            state.fail_on.clear();
        }
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Forgets the recorded calls, e.g. the `list_tasks` made by a load.
    pub fn clear_calls(&self) {
        if let Ok(mut state) = self.lock() {
            state.calls.clear();
        }
    }

    /// The stored copy of a task.
    pub fn get(&self, id: &str) -> Option<Task> {
        let state = self.lock().ok()?;
        state.tasks.iter().find(|(_, t)| t.id == id).map(|(_, t)| t.clone())
    }

    /// Removes a task behind the board's back, as another client would.
    pub fn remove_external(&self, id: &str) -> Option<Task> {
        let mut state = self.lock().ok()?;
        let pos = state.position(id).ok()?;
        Some(state.tasks.remove(pos).1)
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>> {
        let mut state = self.lock()?;
        state.calls.push(AdapterCall::ListTasks(project_id.to_string()));
        state.check_injected(&[])?;
        Ok(state
            .tasks
            .iter()
            .filter(|(p, _)| p == project_id)
            .map(|(_, t)| t.clone())
            .collect())
    }

    fn create_task(&self, project_id: &str, draft: &TaskDraft) -> Result<Task> {
        let mut state = self.lock()?;
        state.calls.push(AdapterCall::CreateTask(draft.title.clone()));
        state.check_injected(&[])?;
        validate_draft(draft)?;

        state.next_seq += 1;
        let task = draft.clone().into_task(format!("T-{}", state.next_seq));
        state.tasks.push((project_id.to_string(), task.clone()));
        debug!(id = %task.id, "memory adapter created task");
        Ok(task)
    }

    fn update_task(&self, id: &str, updates: &TaskUpdates) -> Result<Task> {
        let mut state = self.lock()?;
        state.calls.push(AdapterCall::UpdateTask(id.to_string()));
        state.check_injected(&[id])?;
        validate_updates(updates)?;

        let pos = state.position(id)?;
        let task = &mut state.tasks[pos].1;
        task.apply_updates(updates);
        Ok(task.clone())
    }

    fn update_tasks(&self, batch: &[(TaskId, TaskUpdates)]) -> Result<Vec<Task>> {
        let mut state = self.lock()?;
        let ids: Vec<&str> = batch.iter().map(|(id, _)| id.as_str()).collect();
        state
            .calls
            .push(AdapterCall::UpdateTasks(batch.iter().map(|(id, _)| id.clone()).collect()));
        state.check_injected(&ids)?;

        // Validate and resolve the whole batch before touching anything.
        let mut positions = Vec::with_capacity(batch.len());
        for (id, updates) in batch {
            validate_updates(updates)?;
            positions.push(state.position(id)?);
        }

        let mut updated = Vec::with_capacity(batch.len());
        for (pos, (_, updates)) in positions.into_iter().zip(batch) {
            let task = &mut state.tasks[pos].1;
            task.apply_updates(updates);
            updated.push(task.clone());
        }
        Ok(updated)
    }

    fn delete_task(&self, id: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.calls.push(AdapterCall::DeleteTask(id.to_string()));
        state.check_injected(&[id])?;
        let pos = state.position(id)?;
        state.tasks.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tack_core::enums::Priority;

    fn seeded() -> MemoryAdapter {
        MemoryAdapter::with_tasks("p", vec![Task::new("T-1", "One"), Task::new("T-2", "Two")])
    }

    #[test]
    fn create_issues_ids_after_seeded_tasks() {
        let adapter = seeded();
        let task = adapter.create_task("p", &TaskDraft::new("Three")).unwrap();
        assert_eq!(task.id, "T-3");
        assert_eq!(adapter.list_tasks("p").unwrap().len(), 3);
        assert!(adapter.list_tasks("other").unwrap().is_empty());
    }

    #[test]
    fn fail_next_is_consumed() {
        let adapter = seeded();
        adapter.fail_next(1);
        assert!(adapter.list_tasks("p").unwrap_err().is_retryable());
        assert!(adapter.list_tasks("p").is_ok());
    }

    #[test]
    fn fail_on_rejects_whole_batch() {
        let adapter = seeded();
        adapter.fail_on("T-2");
        let batch = vec![
            ("T-1".to_string(), TaskUpdates::priority(Priority::Urgent)),
            ("T-2".to_string(), TaskUpdates::priority(Priority::Urgent)),
        ];
        assert!(adapter.update_tasks(&batch).is_err());
        assert_eq!(adapter.get("T-1").unwrap().priority, Priority::Medium);

        adapter.clear_failures();
        assert_eq!(adapter.update_tasks(&batch).unwrap().len(), 2);
        assert_eq!(adapter.get("T-2").unwrap().priority, Priority::Urgent);
    }

    #[test]
    fn missing_id_fails_batch_without_partial_writes() {
        let adapter = seeded();
        let batch = vec![
            ("T-1".to_string(), TaskUpdates::status("DONE")),
            ("T-9".to_string(), TaskUpdates::status("DONE")),
        ];
        assert!(adapter.update_tasks(&batch).unwrap_err().is_not_found());
        assert_eq!(adapter.get("T-1").unwrap().status, "TODO");
    }

    #[test]
    fn calls_are_recorded() {
        let adapter = seeded();
        adapter.delete_task("T-1").unwrap();
        assert!(adapter.delete_task("T-1").unwrap_err().is_not_found());
        assert_eq!(
            adapter.calls(),
            vec![
                AdapterCall::DeleteTask("T-1".into()),
                AdapterCall::DeleteTask("T-1".into())
            ]
        );

        adapter.clear_calls();
        assert!(adapter.calls().is_empty());
        adapter.list_tasks("p").unwrap();
        assert_eq!(adapter.calls(), vec![AdapterCall::ListTasks("p".into())]);
    }

    #[test]
    fn deleted_ids_are_not_reissued() {
        let adapter = seeded();
        adapter.delete_task("T-2").unwrap();
        let task = adapter.create_task("p", &TaskDraft::new("Three")).unwrap();
        assert_eq!(task.id, "T-3");
    }
}
