//! Task CRUD operations for [`SqliteAdapter`].

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use tack_core::task::{Task, TaskDraft, TaskId, TaskUpdates};
use tack_core::validation::{validate_draft, validate_updates};

use crate::error::{Result, StorageError};
use crate::sqlite::SqliteAdapter;

/// Columns selected for a [`Task`], in the order [`scan_task`] reads them.
const TASK_COLUMNS: &str = "id, title, description, priority, status, task_type, due_date, \
                            assignee_id, tags, comment_count, attachment_count";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

/// Parses a TEXT column with `FromStr`, reporting failures as conversion errors.
fn parse_column<T>(row: &Row<'_>, idx: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    let column = row.as_ref().column_index(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Deserialises a row into a [`Task`].
pub(crate) fn scan_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(s) => Some(NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
        })?),
        None => None,
    };

    let tags_json: String = row.get("tags")?;
    let tags: BTreeSet<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: parse_column(row, "priority")?,
        status: row.get("status")?,
        task_type: parse_column(row, "task_type")?,
        due_date,
        assignee_id: row.get("assignee_id")?,
        tags,
        comment_count: row.get("comment_count")?,
        attachment_count: row.get("attachment_count")?,
    })
}

/// Formats a `DateTime<Utc>` as ISO 8601 TEXT for SQLite.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared between single and batch operations)
// ---------------------------------------------------------------------------

pub(crate) fn get_task_on_conn(conn: &Connection, id: &str) -> Result<Task> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
    conn.query_row(&sql, params![id], scan_task)
        .optional()?
        .ok_or_else(|| StorageError::not_found("task", id))
}

fn next_task_id(conn: &Connection) -> Result<(i64, String)> {
    let prefix: String = conn
        .query_row("SELECT value FROM config WHERE key = 'id_prefix'", [], |row| {
            row.get(0)
        })
        .optional()?
        .unwrap_or_else(|| "T".to_string());
    // `last_seq` only grows, so ids of deleted tasks are never issued again.
    let seq: i64 = conn.query_row(
        "SELECT MAX(
             COALESCE((SELECT CAST(value AS INTEGER) FROM config WHERE key = 'last_seq'), 0),
             COALESCE((SELECT MAX(seq) FROM tasks), 0)
         ) + 1",
        [],
        |row| row.get(0),
    )?;
    Ok((seq, format!("{prefix}-{seq}")))
}

pub(crate) fn insert_task_on_conn(conn: &Connection, project_id: &str, draft: &TaskDraft) -> Result<Task> {
    let (seq, id) = next_task_id(conn)?;
    let task = draft.clone().into_task(id);
    let now_str = format_datetime(&Utc::now());
    let tags = serde_json::to_string(&task.tags)?;

    conn.execute(
        "INSERT INTO tasks (id, project_id, seq, title, description, priority, status,
                            task_type, due_date, assignee_id, tags, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        params![
            task.id,
            project_id,
            seq,
            task.title,
            task.description,
            task.priority.as_str(),
            task.status,
            task.task_type.as_str(),
            task.due_date.as_ref().map(format_date),
            task.assignee_id,
            tags,
            now_str,
        ],
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO config (key, value) VALUES ('last_seq', ?1)",
        params![seq.to_string()],
    )?;
    Ok(task)
}

/// Applies partial updates on the given connection and returns the stored task.
pub(crate) fn update_task_on_conn(conn: &Connection, id: &str, updates: &TaskUpdates) -> Result<Task> {
    validate_updates(updates)?;

    let mut set_clauses: Vec<&str> = Vec::new();
    let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

    macro_rules! add_field {
        ($col:literal, $value:expr) => {
            set_clauses.push(concat!($col, " = ?"));
            param_values.push(Box::new($value));
        };
    }

    if let Some(ref title) = updates.title {
        add_field!("title", title.trim().to_string());
    }
    if let Some(ref description) = updates.description {
        add_field!("description", description.clone());
    }
    if let Some(priority) = updates.priority {
        add_field!("priority", priority.as_str());
    }
    if let Some(ref status) = updates.status {
        add_field!("status", status.clone());
    }
    if let Some(task_type) = updates.task_type {
        add_field!("task_type", task_type.as_str());
    }
    if let Some(due_date) = updates.due_date {
        add_field!("due_date", due_date.as_ref().map(format_date));
    }
    if let Some(ref assignee_id) = updates.assignee_id {
        add_field!("assignee_id", assignee_id.clone().filter(|a| !a.is_empty()));
    }
    if let Some(ref tags) = updates.tags {
        add_field!("tags", serde_json::to_string(tags)?);
    }

    if set_clauses.is_empty() {
        return get_task_on_conn(conn, id);
    }

    add_field!("updated_at", format_datetime(&Utc::now()));
    param_values.push(Box::new(id.to_string()));

    let sql = format!("UPDATE tasks SET {} WHERE id = ?", set_clauses.join(", "));
    let param_refs: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

    let affected = conn.execute(&sql, param_refs.as_slice())?;
    if affected == 0 {
        return Err(StorageError::not_found("task", id));
    }

    get_task_on_conn(conn, id)
}

pub(crate) fn delete_task_on_conn(conn: &Connection, id: &str) -> Result<()> {
    let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    if affected == 0 {
        return Err(StorageError::not_found("task", id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteAdapter task methods
// ---------------------------------------------------------------------------

impl SqliteAdapter {
    /// Lists every task of a project in creation order.
    pub fn list_tasks_impl(&self, project_id: &str) -> Result<Vec<Task>> {
        let conn = self.lock_conn()?;
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = ?1 ORDER BY seq");
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![project_id], scan_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        info!(project = project_id, count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    pub fn create_task_impl(&self, project_id: &str, draft: &TaskDraft) -> Result<Task> {
        validate_draft(draft)?;
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;
        let task = insert_task_on_conn(&tx, project_id, draft)?;
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        debug!(id = %task.id, project = project_id, "created task");
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        let conn = self.lock_conn()?;
        get_task_on_conn(&conn, id)
    }

    pub fn update_task_impl(&self, id: &str, updates: &TaskUpdates) -> Result<Task> {
        let conn = self.lock_conn()?;
        update_task_on_conn(&conn, id, updates)
    }

    /// Applies every update in one transaction. The first failure rolls back
    /// the whole batch.
    pub fn update_tasks_impl(&self, batch: &[(TaskId, TaskUpdates)]) -> Result<Vec<Task>> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;
        let mut updated = Vec::with_capacity(batch.len());
        for (id, updates) in batch {
            updated.push(update_task_on_conn(&tx, id, updates)?);
        }
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        debug!(count = updated.len(), "updated task batch");
        Ok(updated)
    }

    pub fn delete_task_impl(&self, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_task_on_conn(&conn, id)?;
        debug!(id, "deleted task");
        Ok(())
    }
}
