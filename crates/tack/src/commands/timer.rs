//! `tack timer` -- start, stop and inspect per-task time tracking.

use anyhow::Result;

use crate::cli::{TimerArgs, TimerCommands};
use crate::context::RuntimeContext;
use crate::output::{format_elapsed, output_json};

/// Execute a `tack timer` subcommand.
pub fn run(ctx: &RuntimeContext, args: &TimerArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    let (id, message) = match &args.command {
        TimerCommands::Start(id_args) => {
            let id = id_args.id.as_str();
            let message = if board.start_timer(id)? {
                format!("Started timer on {id}")
            } else {
                format!("Timer on {id} is already running")
            };
            (id, Some(message))
        }
        TimerCommands::Stop(id_args) => {
            let id = id_args.id.as_str();
            let message = if board.stop_timer(id)? {
                format!("Stopped timer on {id}")
            } else {
                format!("Timer on {id} is not running")
            };
            (id, Some(message))
        }
        TimerCommands::Show(id_args) => (id_args.id.as_str(), None),
    };

    let timer = board.timer(id)?;
    let tracked = board.tracked_secs(id)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "id": id,
            "running": timer.is_running(),
            "tracked_secs": tracked,
        }));
    } else if !ctx.quiet {
        if let Some(message) = message {
            println!("{message}");
        }
        let state = if timer.is_running() { " (running)" } else { "" };
        println!("{id}: {}{state}", format_elapsed(tracked));
    }
    Ok(())
}
