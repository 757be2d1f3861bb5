//! `tack bulk` -- select tasks, then apply one action to all of them.

use std::collections::HashSet;

use anyhow::{Result, bail};

use tack_board::{Board, Toggle};
use tack_storage::PersistenceAdapter;

use super::apply_filter;
use crate::cli::{BulkArgs, BulkCommands, SelectArgs};
use crate::context::RuntimeContext;
use crate::output::{StdoutSink, output_json};

/// Builds the selection the way a user would: filter first, then tick
/// cards (or select all visible).
fn select<A: PersistenceAdapter>(board: &mut Board<A>, args: &SelectArgs) -> Result<usize> {
    apply_filter(board, &args.filter)?;
    if args.all {
        return Ok(board.select_all());
    }
    let mut seen = HashSet::new();
    for id in args.ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !seen.insert(id) {
            continue;
        }
        if board.toggle_selection(id) == Toggle::NotVisible {
            bail!("task {id} is not on the board or is hidden by the filter");
        }
    }
    Ok(board.selection().len())
}

/// Execute a `tack bulk` subcommand.
pub fn run(ctx: &RuntimeContext, args: &BulkArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    let (action, count) = match &args.command {
        BulkCommands::Priority { level, select: sel } => {
            select(board, sel)?;
            ("priority", board.bulk_set_priority(*level)?)
        }
        BulkCommands::Assign { user, select: sel } => {
            select(board, sel)?;
            let assignee = user.as_ref().map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
            ("assign", board.bulk_assign(assignee)?)
        }
        BulkCommands::Move { column, select: sel } => {
            select(board, sel)?;
            ("move", board.bulk_move(column)?)
        }
        BulkCommands::Send { channel, select: sel } => {
            select(board, sel)?;
            let sink = StdoutSink {
                quiet: ctx.quiet || ctx.json,
            };
            ("send", board.bulk_send_to_channel(&sink, channel)?)
        }
    };

    if ctx.json {
        output_json(&serde_json::json!({
            "action": action,
            "count": count,
        }));
    } else if !ctx.quiet {
        match count {
            0 => println!("No tasks selected."),
            1 => println!("Applied {action} to 1 task."),
            n => println!("Applied {action} to {n} tasks."),
        }
    }
    Ok(())
}
