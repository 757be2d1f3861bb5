//! Task struct -- the central domain model for the board.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskType};

/// Identifier of a task, unique per project.
pub type TaskId = String;

/// Identifier of a column. A task's `status` is the id of the column it lives in.
pub type ColumnId = String;

/// Status assigned to tasks that arrive without one.
pub const DEFAULT_STATUS: &str = "TODO";

fn default_status() -> ColumnId {
    DEFAULT_STATUS.to_string()
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Represents a card on the board.
///
/// Optional fields are explicit `Option`s; every default is resolved here at
/// construction or deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub priority: Priority,

    /// Id of the column this task belongs to.
    #[serde(default = "default_status")]
    pub status: ColumnId,

    #[serde(default, rename = "type")]
    pub task_type: TaskType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub comment_count: u32,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub attachment_count: u32,
}

impl Task {
    /// Creates a task with the given id and title and default values elsewhere.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: default_status(),
            task_type: TaskType::default(),
            due_date: None,
            assignee_id: None,
            tags: BTreeSet::new(),
            comment_count: 0,
            attachment_count: 0,
        }
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Applies a partial update. `None` fields are left unchanged.
    pub fn apply_updates(&mut self, updates: &TaskUpdates) {
        if let Some(ref title) = updates.title {
            self.title = title.trim().to_string();
        }
        if let Some(ref description) = updates.description {
            self.description = description.clone();
        }
        if let Some(priority) = updates.priority {
            self.priority = priority;
        }
        if let Some(ref status) = updates.status {
            self.status = status.clone();
        }
        if let Some(task_type) = updates.task_type {
            self.task_type = task_type;
        }
        if let Some(due_date) = updates.due_date {
            self.due_date = due_date;
        }
        if let Some(ref assignee_id) = updates.assignee_id {
            self.assignee_id = assignee_id.clone().filter(|a| !a.is_empty());
        }
        if let Some(ref tags) = updates.tags {
            self.tags = tags.clone();
        }
    }

    /// Returns a copy of this task with `updates` applied.
    pub fn with_updates(&self, updates: &TaskUpdates) -> Self {
        let mut next = self.clone();
        next.apply_updates(updates);
        next
    }
}

/// Typed partial-update struct for tasks.
///
/// Only `Some` fields are applied. Clearable fields use `Option<Option<_>>`:
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdates {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<ColumnId>,
    pub task_type: Option<TaskType>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee_id: Option<Option<String>>,
    pub tags: Option<BTreeSet<String>>,
}

impl TaskUpdates {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    pub fn status(status: impl Into<ColumnId>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn assignee(assignee_id: Option<String>) -> Self {
        Self {
            assignee_id: Some(assignee_id),
            ..Self::default()
        }
    }

    pub fn task_type(task_type: TaskType) -> Self {
        Self {
            task_type: Some(task_type),
            ..Self::default()
        }
    }

    pub fn due_date(due_date: Option<NaiveDate>) -> Self {
        Self {
            due_date: Some(due_date),
            ..Self::default()
        }
    }

    pub fn tags(tags: BTreeSet<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }
}

/// The fields a caller supplies when creating a task. The id is issued by
/// the persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_status")]
    pub status: ColumnId,
    #[serde(default, rename = "type")]
    pub task_type: TaskType,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            status: default_status(),
            task_type: TaskType::default(),
            due_date: None,
            assignee_id: None,
            tags: BTreeSet::new(),
        }
    }

    /// Materialises the draft as a task with the issued id.
    pub fn into_task(self, id: impl Into<TaskId>) -> Task {
        Task {
            id: id.into(),
            title: self.title.trim().to_string(),
            description: self.description,
            priority: self.priority,
            status: self.status,
            task_type: self.task_type,
            due_date: self.due_date,
            assignee_id: self.assignee_id.filter(|a| !a.is_empty()),
            tags: self.tags,
            comment_count: 0,
            attachment_count: 0,
        }
    }
}

/// Builder for constructing a [`Task`] with a fluent API.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    /// Creates a new builder with the given id and title.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            task: Task::new(id, title),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn status(mut self, status: impl Into<ColumnId>) -> Self {
        self.task.status = status.into();
        self
    }

    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.task.task_type = task_type;
        self
    }

    pub fn due_date(mut self, due: NaiveDate) -> Self {
        self.task.due_date = Some(due);
        self
    }

    pub fn assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.task.assignee_id = Some(assignee_id.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.task.tags.insert(tag.into());
        self
    }

    pub fn comment_count(mut self, n: u32) -> Self {
        self.task.comment_count = n;
        self
    }

    pub fn attachment_count(mut self, n: u32) -> Self {
        self.task.attachment_count = n;
        self
    }

    /// Consumes the builder and returns the constructed [`Task`].
    pub fn build(self) -> Task {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_task_resolves_defaults() {
        let task = Task::new("T-1", "Write docs");
        assert_eq!(task.status, DEFAULT_STATUS);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.task_type, TaskType::Task);
        assert!(task.due_date.is_none());
        assert!(task.tags.is_empty());
    }

    #[test]
    fn deserialize_fills_defaults_once() {
        let task: Task = serde_json::from_str(r#"{"id": "T-9", "title": "Sparse"}"#).unwrap();
        assert_eq!(task, Task::new("T-9", "Sparse"));
    }

    #[test]
    fn serialize_uses_type_key_and_skips_empty_fields() {
        let task = TaskBuilder::new("T-2", "Crash on save")
            .task_type(TaskType::Bug)
            .build();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "BUG");
        assert!(json.get("due_date").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn matches_text_checks_title_and_description() {
        let task = TaskBuilder::new("T-3", "Refactor")
            .description("Touches the Login form")
            .build();
        assert!(task.matches_text("login"));
        assert!(task.matches_text("refac"));
        assert!(!task.matches_text("export"));
    }

    #[test]
    fn apply_updates_only_touches_set_fields() {
        let mut task = TaskBuilder::new("T-4", "Ship it")
            .assignee("alice")
            .due_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .build();
        task.apply_updates(&TaskUpdates {
            priority: Some(Priority::Urgent),
            due_date: Some(None),
            ..TaskUpdates::default()
        });
        assert_eq!(task.priority, Priority::Urgent);
        assert!(task.due_date.is_none());
        assert_eq!(task.assignee_id.as_deref(), Some("alice"));
        assert_eq!(task.title, "Ship it");
    }

    #[test]
    fn draft_into_task_trims_title_and_drops_empty_assignee() {
        let mut draft = TaskDraft::new("  Plan sprint ");
        draft.assignee_id = Some(String::new());
        let task = draft.into_task("T-5");
        assert_eq!(task.title, "Plan sprint");
        assert!(task.assignee_id.is_none());
        assert_eq!(task.id, "T-5");
    }

    #[test]
    fn updates_normalize_title_and_assignee() {
        let task = Task::new("T-6", "Old").with_updates(&TaskUpdates {
            title: Some("  New title \n".into()),
            ..TaskUpdates::default()
        });
        assert_eq!(task.title, "New title");

        let unassigned = task.with_updates(&TaskUpdates::assignee(Some(String::new())));
        assert!(unassigned.assignee_id.is_none());
    }

    #[test]
    fn empty_updates() {
        assert!(TaskUpdates::default().is_empty());
        assert!(!TaskUpdates::priority(Priority::Low).is_empty());
    }
}
