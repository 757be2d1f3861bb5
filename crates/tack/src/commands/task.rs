//! Context-menu commands: `tack toggle-type` and `tack delete`.

use anyhow::Result;

use tack_board::ContextAction;

use crate::cli::IdArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tack toggle-type` command.
pub fn run_toggle_type(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    board.apply_context_action(&args.id, ContextAction::ToggleType)?;
    let task = board.task(&args.id)?;

    if ctx.json {
        output_json(task);
    } else if !ctx.quiet {
        println!("{} is now a {}", task.id, task.task_type);
    }
    Ok(())
}

/// Execute the `tack delete` command.
pub fn run_delete(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    session.board.apply_context_action(&args.id, ContextAction::Delete)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "id": args.id,
            "deleted": true,
        }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}
