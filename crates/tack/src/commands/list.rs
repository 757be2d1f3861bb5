//! `tack list` -- visible tasks in board order.

use anyhow::Result;

use tack_core::task::Task;

use super::apply_filter;
use crate::cli::ListArgs;
use crate::context::RuntimeContext;
use crate::output::{TASK_HEADERS, format_task_row, output_json, output_table};

/// Execute the `tack list` command.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    apply_filter(&mut session.board, &args.filter)?;

    let tasks: Vec<Task> = session
        .board
        .columns()
        .into_iter()
        .flat_map(|c| c.tasks)
        .collect();

    if ctx.json {
        output_json(&tasks);
        return Ok(());
    }
    if tasks.is_empty() {
        if !ctx.quiet {
            println!("No tasks found.");
        }
        return Ok(());
    }
    let rows: Vec<Vec<String>> = tasks.iter().map(format_task_row).collect();
    output_table(TASK_HEADERS, &rows);
    Ok(())
}
