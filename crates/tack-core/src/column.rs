//! Column model: ordered workflow columns and their task membership.
//!
//! A task with `status == column.id` lives in exactly that column's sequence
//! and in no other. Every mutation returns a new model and leaves `self`
//! untouched, so a caller can keep the previous model as a rollback snapshot.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::filter::{self, FilterCriteria};
use crate::task::{ColumnId, Task, TaskId, TaskUpdates};

/// Color given to columns that are created without one.
pub const DEFAULT_COLUMN_COLOR: &str = "#8a8f98";

/// Error type for column model operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("task {task_id} not found in column {column_id}")]
    TaskNotFound { task_id: TaskId, column_id: ColumnId },

    #[error("column already exists: {0}")]
    DuplicateColumn(ColumnId),

    #[error("task already on the board: {0}")]
    DuplicateTask(TaskId),

    #[error("column id is required")]
    IdRequired,

    #[error("column name is required")]
    NameRequired,
}

/// Result type alias for column operations.
pub type Result<T> = std::result::Result<T, ColumnError>;

/// Column metadata without its tasks. A board layout is a `Vec<ColumnSpec>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLUMN_COLOR.to_string()
}

impl ColumnSpec {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// A column named after its id, with the default color.
    pub fn from_status(status: &str) -> Self {
        Self::new(status, status, DEFAULT_COLUMN_COLOR)
    }
}

/// A workflow column and the tasks in it, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: String,
    pub tasks: Vec<Task>,
}

impl Column {
    fn from_spec(spec: ColumnSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            color: spec.color,
            tasks: Vec::new(),
        }
    }

    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(self.id.clone(), self.name.clone(), self.color.clone())
    }

    fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

/// The unfiltered board: columns in user order, each holding its tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnModel {
    columns: Vec<Column>,
}

impl ColumnModel {
    /// An empty board with the given layout.
    pub fn new(layout: &[ColumnSpec]) -> Self {
        Self::distribute(layout, Vec::new())
    }

    /// Partitions `tasks` into the layout's columns by status.
    ///
    /// Relative order within each column follows the input order. A status
    /// that names no column gets a column appended for it.
    pub fn distribute(layout: &[ColumnSpec], tasks: Vec<Task>) -> Self {
        let mut columns: Vec<Column> = Vec::with_capacity(layout.len());
        let mut index: HashMap<ColumnId, usize> = HashMap::new();

        for spec in layout {
            if index.contains_key(&spec.id) {
                warn!(column = %spec.id, "duplicate column in layout, ignoring");
                continue;
            }
            index.insert(spec.id.clone(), columns.len());
            columns.push(Column::from_spec(spec.clone()));
        }

        for task in tasks {
            let slot = match index.get(&task.status) {
                Some(&i) => i,
                None => {
                    warn!(status = %task.status, task = %task.id, "no column for status, adding one");
                    let i = columns.len();
                    index.insert(task.status.clone(), i);
                    columns.push(Column::from_spec(ColumnSpec::from_status(&task.status)));
                    i
                }
            };
            columns[slot].tasks.push(task);
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// The current column order and metadata.
    pub fn layout(&self) -> Vec<ColumnSpec> {
        self.columns.iter().map(Column::spec).collect()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Every task in board order: column by column, top to bottom.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks().find(|t| t.id == task_id)
    }

    /// Id of the column holding `task_id`.
    pub fn column_of(&self, task_id: &str) -> Option<&ColumnId> {
        self.columns
            .iter()
            .find(|c| c.position(task_id).is_some())
            .map(|c| &c.id)
    }

    /// The rendered columns: every column, with `criteria` applied to its tasks.
    pub fn view<Tz: TimeZone>(
        &self,
        criteria: &FilterCriteria,
        now: &DateTime<Tz>,
        done_column: &str,
    ) -> Vec<Column> {
        self.view_on(criteria, now.date_naive(), done_column)
    }

    pub fn view_on(&self, criteria: &FilterCriteria, today: NaiveDate, done_column: &str) -> Vec<Column> {
        self.columns
            .iter()
            .map(|c| Column {
                id: c.id.clone(),
                name: c.name.clone(),
                color: c.color.clone(),
                tasks: filter::apply_on(&c.tasks, criteria, today, done_column),
            })
            .collect()
    }

    fn column_index(&self, id: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ColumnError::ColumnNotFound(id.to_string()))
    }

    /// Moves a task between (or within) columns.
    ///
    /// `target_index` is clamped to the target column's length after the task
    /// is taken out. The moved task's status becomes `to`.
    pub fn move_task(&self, task_id: &str, from: &str, to: &str, target_index: usize) -> Result<Self> {
        let src = self.column_index(from)?;
        let dst = self.column_index(to)?;
        let pos = self.columns[src]
            .position(task_id)
            .ok_or_else(|| ColumnError::TaskNotFound {
                task_id: task_id.to_string(),
                column_id: from.to_string(),
            })?;

        if src == dst {
            let last = self.columns[src].tasks.len() - 1;
            if target_index.min(last) == pos {
                debug!(task = %task_id, column = %from, "move to same position, no-op");
                return Ok(self.clone());
            }
        }

        let mut next = self.clone();
        let mut task = next.columns[src].tasks.remove(pos);
        task.status = to.to_string();
        let tasks = &mut next.columns[dst].tasks;
        let at = target_index.min(tasks.len());
        tasks.insert(at, task);

        debug!(task = %task_id, from = %from, to = %to, index = at, "moved task");
        Ok(next)
    }

    /// Moves `dragged` to `target`'s position, shifting the columns between.
    pub fn reorder_columns(&self, dragged: &str, target: &str) -> Result<Self> {
        let from = self.column_index(dragged)?;
        let to = self.column_index(target)?;
        if from == to {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        let column = next.columns.remove(from);
        next.columns.insert(to, column);
        debug!(column = %dragged, index = to, "reordered column");
        Ok(next)
    }

    pub fn rename_column(&self, id: &str, name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ColumnError::NameRequired);
        }
        let i = self.column_index(id)?;
        let mut next = self.clone();
        next.columns[i].name = name.to_string();
        Ok(next)
    }

    /// Appends an empty column.
    pub fn add_column(&self, spec: ColumnSpec) -> Result<Self> {
        if spec.id.trim().is_empty() {
            return Err(ColumnError::IdRequired);
        }
        if spec.name.trim().is_empty() {
            return Err(ColumnError::NameRequired);
        }
        if self.column(&spec.id).is_some() {
            return Err(ColumnError::DuplicateColumn(spec.id));
        }
        let mut next = self.clone();
        next.columns.push(Column::from_spec(spec));
        Ok(next)
    }

    /// Appends a task to the column named by its status.
    pub fn insert_task(&self, task: Task) -> Result<Self> {
        if self.find_task(&task.id).is_some() {
            return Err(ColumnError::DuplicateTask(task.id));
        }
        let i = self.column_index(&task.status)?;
        let mut next = self.clone();
        next.columns[i].tasks.push(task);
        Ok(next)
    }

    /// Takes a task off the board, returning the new model and the task.
    pub fn remove_task(&self, task_id: &str) -> Result<(Self, Task)> {
        let (ci, pos) = self.locate(task_id)?;
        let mut next = self.clone();
        let task = next.columns[ci].tasks.remove(pos);
        Ok((next, task))
    }

    /// Applies `updates` to a task in place.
    ///
    /// A status change moves the task to the end of its new column.
    pub fn update_task(&self, task_id: &str, updates: &TaskUpdates) -> Result<Self> {
        let (ci, pos) = self.locate(task_id)?;
        let current = &self.columns[ci].tasks[pos];
        let updated = current.with_updates(updates);

        if updated.status == current.status {
            let mut next = self.clone();
            next.columns[ci].tasks[pos] = updated;
            return Ok(next);
        }

        let dst = self.column_index(&updated.status)?;
        let mut next = self.clone();
        next.columns[ci].tasks.remove(pos);
        next.columns[dst].tasks.push(updated);
        Ok(next)
    }

    fn locate(&self, task_id: &str) -> Result<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, c)| c.position(task_id).map(|pos| (ci, pos)))
            .ok_or_else(|| ColumnError::TaskNotFound {
                task_id: task_id.to_string(),
                column_id: String::new(),
            })
    }
}
