//! DDL statements and migrations for the SQLite schema.
//!
//! Dates are stored as TEXT (`YYYY-MM-DD`), timestamps as ISO 8601 TEXT and
//! tag sets as JSON arrays.

/// Current schema version. Bumped whenever DDL or migrations change.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id                TEXT PRIMARY KEY,
        project_id        TEXT NOT NULL,
        seq               INTEGER NOT NULL,
        title             TEXT NOT NULL,
        description       TEXT NOT NULL DEFAULT '',
        priority          TEXT NOT NULL DEFAULT 'MEDIUM',
        status            TEXT NOT NULL DEFAULT 'TODO',
        task_type         TEXT NOT NULL DEFAULT 'TASK',
        due_date          TEXT,
        assignee_id       TEXT,
        tags              TEXT NOT NULL DEFAULT '[]',
        comment_count     INTEGER NOT NULL DEFAULT 0,
        attachment_count  INTEGER NOT NULL DEFAULT 0,
        created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        updated_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS config (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

/// Default configuration rows inserted on first init.
pub const DEFAULT_CONFIG: &[(&str, &str)] = &[("id_prefix", "T")];

/// Named migrations applied in order after the base DDL.
pub const MIGRATIONS: &[(&str, &str)] = &[(
    "tasks_project_seq_index",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project_seq ON tasks(project_id, seq)",
)];
