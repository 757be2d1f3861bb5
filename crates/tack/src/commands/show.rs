//! `tack show` -- open a task's detail view.

use anyhow::Result;

use tack_ui::board::render_task_detail;
use tack_ui::terminal::terminal_width;

use crate::cli::IdArgs;
use crate::context::RuntimeContext;
use crate::output::{format_elapsed, output_json};

/// Execute the `tack show` command.
pub fn run(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    let task = board.activate_task(&args.id)?;
    let tracked = board.tracked_secs(&task.id)?;
    let column_name = board
        .model()
        .columns()
        .iter()
        .find(|c| c.id == task.status)
        .map_or_else(|| task.status.clone(), |c| c.name.clone());

    if ctx.json {
        output_json(&serde_json::json!({
            "task": task,
            "column": column_name,
            "tracked_secs": tracked,
        }));
        return Ok(());
    }

    print!("{}", render_task_detail(&task, &column_name, terminal_width()));
    if tracked > 0 {
        println!("Tracked:  {}", format_elapsed(tracked));
    }
    Ok(())
}
