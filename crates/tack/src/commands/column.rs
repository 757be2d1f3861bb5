//! `tack column` -- column metadata: add, rename, reorder.

use anyhow::{Result, bail};

use tack_board::DropOutcome;
use tack_core::column::{DEFAULT_COLUMN_COLOR, ColumnSpec};
use tack_ui::styles::parse_hex_color;

use crate::cli::{ColumnArgs, ColumnCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute a `tack column` subcommand. The new layout is saved to the
/// preference store.
pub fn run(ctx: &RuntimeContext, args: &ColumnArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    let board = &mut session.board;

    let message = match &args.command {
        ColumnCommands::Add { id, name, color } => {
            let color = match color {
                Some(c) if parse_hex_color(c).is_none() => bail!("invalid color '{c}' (expected #rrggbb)"),
                Some(c) => c.clone(),
                None => DEFAULT_COLUMN_COLOR.to_string(),
            };
            board.add_column(ColumnSpec::new(id.clone(), name.clone(), color))?;
            format!("Added column {id}")
        }
        ColumnCommands::Rename { id, name } => {
            board.rename_column(id, name)?;
            format!("Renamed column {id} to {}", name.trim())
        }
        ColumnCommands::Reorder { id, target } => {
            board.start_column_drag(id)?;
            match board.drop_column(target)? {
                DropOutcome::Reordered { .. } => format!("Moved column {id} to {target}'s position"),
                _ => format!("Column {id} is already there"),
            }
        }
    };

    if ctx.json {
        output_json(&board.model().layout());
    } else if !ctx.quiet {
        println!("{message}");
    }
    Ok(())
}
