//! `tack move` -- drag a task onto another column.

use anyhow::Result;

use tack_board::{CancelReason, DropOutcome};

use crate::cli::MoveArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tack move` command.
///
/// Replays a drag: start on the task, hover the target column, drop.
pub fn run(ctx: &RuntimeContext, args: &MoveArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    board.start_task_drag(&args.id)?;
    board.drag_over_column(&args.column)?;
    let outcome = board.drop_task(None, args.index.unwrap_or(usize::MAX))?;

    let (moved, message) = match &outcome {
        DropOutcome::Moved { task_id, column_id } => (true, format!("Moved {task_id} to {column_id}")),
        DropOutcome::Cancelled(CancelReason::SameColumn) => {
            (false, format!("{} is already in {}", args.id, args.column))
        }
        DropOutcome::Cancelled(reason) => (false, format!("Move cancelled: {reason:?}")),
        DropOutcome::Reordered { .. } | DropOutcome::Ignored => (false, "Nothing to do".to_string()),
    };

    if ctx.json {
        output_json(&serde_json::json!({
            "id": args.id,
            "column": args.column,
            "moved": moved,
        }));
    } else if !ctx.quiet {
        println!("{message}");
    }
    Ok(())
}
