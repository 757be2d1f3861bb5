//! `tack create` -- add a task to the board.

use anyhow::Result;

use tack_core::task::{DEFAULT_STATUS, TaskDraft};

use crate::cli::CreateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tack create` command.
pub fn run(ctx: &RuntimeContext, args: &CreateArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    let status = match &args.status {
        Some(status) => status.clone(),
        None => board
            .model()
            .columns()
            .first()
            .map_or_else(|| DEFAULT_STATUS.to_string(), |c| c.id.clone()),
    };

    let mut draft = TaskDraft::new(args.title.clone());
    draft.description = args.description.clone().unwrap_or_default();
    draft.priority = args.priority;
    draft.task_type = args.task_type;
    draft.status = status;
    draft.due_date = args.due;
    draft.assignee_id = args.assignee.clone();
    draft.tags = args
        .tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let task = board.create_task(draft)?;

    if ctx.json {
        output_json(&task);
    } else if !ctx.quiet {
        println!("Created {}: {}", task.id, task.title);
    }
    Ok(())
}
