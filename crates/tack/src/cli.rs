//! Clap CLI definitions for the `tack` command.
//!
//! Every command replays one or more board gestures against the SQLite
//! adapter: a `move` is a drag start, a hover and a drop; `bulk` builds a
//! selection and runs a bulk action; `quick` hovers a card and presses a
//! shortcut key.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use tack_core::enums::{DueBucket, Priority, TaskType};
use tack_core::filter::FilterCriteria;

/// tack -- a kanban board in your terminal.
#[derive(Parser, Debug)]
#[command(
    name = "tack",
    about = "Kanban board state engine and CLI",
    long_about = "Columns are workflow stages, cards are tasks. Move cards between columns, filter the board, and apply bulk actions to a selection.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Board directory (default: $TACK_DIR, or the nearest .tack/ above the cwd).
    #[arg(long, global = true, env = "TACK_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a board in the current directory.
    Init(InitArgs),

    /// Create a task.
    #[command(alias = "new")]
    Create(CreateArgs),

    /// List visible tasks in board order.
    List(ListArgs),

    /// Show the board, column by column.
    Board(ListArgs),

    /// Drag a task onto another column.
    #[command(name = "move")]
    MoveCmd(MoveArgs),

    /// Add, rename or reorder columns.
    Column(ColumnArgs),

    /// Apply an action to a selection of tasks.
    Bulk(BulkArgs),

    /// Quick action on a task: m = assign, d = due date, t = tags.
    Quick(QuickArgs),

    /// Toggle a task between TASK and BUG.
    #[command(name = "toggle-type")]
    ToggleType(IdArgs),

    /// Delete a task.
    Delete(IdArgs),

    /// Show task details.
    #[command(alias = "view")]
    Show(IdArgs),

    /// Track time spent on a task.
    Timer(TimerArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Prefix for task ids (e.g. "T" issues T-1, T-2, ...).
    #[arg(long)]
    pub prefix: Option<String>,

    /// Project id the board loads.
    #[arg(long)]
    pub project: Option<String>,

    /// Re-initialize over an existing board (keeps the tasks).
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Task title.
    pub title: String,

    /// Task description.
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Priority (LOW, MEDIUM, HIGH, URGENT).
    #[arg(short = 'p', long, default_value = "MEDIUM")]
    pub priority: Priority,

    /// Task type (TASK, BUG).
    #[arg(short = 't', long = "type", default_value = "TASK")]
    pub task_type: TaskType,

    /// Column to create the task in (default: the first configured column).
    #[arg(short = 's', long)]
    pub status: Option<String>,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Assignee.
    #[arg(short = 'a', long)]
    pub assignee: Option<String>,

    /// Tags (comma-separated, repeatable).
    #[arg(long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Filtering and selection
// ---------------------------------------------------------------------------

/// Filter flags shared by `list`, `board` and `bulk`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text in title or description.
    #[arg(long)]
    pub text: Option<String>,

    /// Only tasks with this priority.
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Only tasks in this column.
    #[arg(long)]
    pub status: Option<String>,

    /// Only tasks assigned to this user.
    #[arg(long)]
    pub assignee: Option<String>,

    /// Due-date bucket (none, overdue, today, week, month).
    #[arg(long)]
    pub due: Option<DueBucket>,

    /// Only tasks due on or after this date.
    #[arg(long)]
    pub due_from: Option<NaiveDate>,

    /// Only tasks due on or before this date.
    #[arg(long)]
    pub due_to: Option<NaiveDate>,

    /// Start from the saved filter.
    #[arg(long)]
    pub saved: bool,

    /// Save the resulting filter for later `--saved` use.
    #[arg(long)]
    pub save: bool,
}

impl FilterArgs {
    /// Overlays the explicit flags on `base`.
    pub fn apply_to(&self, mut base: FilterCriteria) -> FilterCriteria {
        if self.text.is_some() {
            base.text = self.text.clone();
        }
        if self.priority.is_some() {
            base.priority = self.priority;
        }
        if self.status.is_some() {
            base.status = self.status.clone();
        }
        if self.assignee.is_some() {
            base.assignee_id = self.assignee.clone();
        }
        if let Some(bucket) = self.due {
            base.due_bucket = bucket;
        }
        if self.due_from.is_some() {
            base.due_from = self.due_from;
        }
        if self.due_to.is_some() {
            base.due_to = self.due_to;
        }
        base
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Which tasks a bulk action applies to.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Task ids to select (comma-separated, repeatable).
    #[arg(long, value_delimiter = ',', required_unless_present = "all")]
    pub ids: Vec<String>,

    /// Select every task visible under the filter flags.
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

// ---------------------------------------------------------------------------
// Move / column
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Task to drag.
    pub id: String,

    /// Column to drop it on.
    pub column: String,

    /// Position among the column's cards (default: the end).
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ColumnArgs {
    #[command(subcommand)]
    pub command: ColumnCommands,
}

#[derive(Subcommand, Debug)]
pub enum ColumnCommands {
    /// Append a column.
    Add {
        /// Column id; tasks with this status live in it.
        id: String,
        /// Display name.
        name: String,
        /// Hex color (#rrggbb).
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename a column.
    Rename { id: String, name: String },
    /// Drag a column onto another column's position.
    Reorder { id: String, target: String },
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct BulkArgs {
    #[command(subcommand)]
    pub command: BulkCommands,
}

#[derive(Subcommand, Debug)]
pub enum BulkCommands {
    /// Set the priority of the selected tasks.
    Priority {
        #[arg(value_name = "PRIORITY")]
        level: Priority,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Assign the selected tasks (omit the user to unassign).
    Assign {
        #[arg(value_name = "ASSIGNEE")]
        user: Option<String>,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Move the selected tasks to a column.
    Move {
        column: String,
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Send the selected tasks to a chat channel.
    Send {
        channel: String,
        #[command(flatten)]
        select: SelectArgs,
    },
}

// ---------------------------------------------------------------------------
// Quick / single-task commands
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct QuickArgs {
    /// Task to act on.
    pub id: String,

    /// Shortcut key: m (assign), d (due date) or t (tags).
    pub key: char,

    /// New value: an assignee, a YYYY-MM-DD date, or comma-separated tags.
    /// "none" clears the field.
    pub value: String,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct TimerArgs {
    #[command(subcommand)]
    pub command: TimerCommands,
}

#[derive(Subcommand, Debug)]
pub enum TimerCommands {
    /// Start tracking time on a task.
    Start(IdArgs),
    /// Stop tracking time on a task.
    Stop(IdArgs),
    /// Show the time tracked on a task.
    Show(IdArgs),
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for.
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_flags_override_saved_filter() {
        let saved = FilterCriteria {
            text: Some("bug".into()),
            priority: Some(Priority::High),
            ..FilterCriteria::default()
        };
        let args = FilterArgs {
            priority: Some(Priority::Low),
            due: Some(DueBucket::Week),
            ..FilterArgs::default()
        };
        let merged = args.apply_to(saved);
        assert_eq!(merged.text.as_deref(), Some("bug"));
        assert_eq!(merged.priority, Some(Priority::Low));
        assert_eq!(merged.due_bucket, DueBucket::Week);
    }

    #[test]
    fn bulk_requires_ids_or_all() {
        assert!(Cli::try_parse_from(["tack", "bulk", "priority", "HIGH"]).is_err());
        assert!(Cli::try_parse_from(["tack", "bulk", "priority", "HIGH", "--all"]).is_ok());
        assert!(Cli::try_parse_from(["tack", "bulk", "move", "DONE", "--ids", "T-1,T-2"]).is_ok());
    }
}
