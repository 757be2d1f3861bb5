//! `tack board` -- render the filtered board.

use anyhow::Result;

use tack_ui::board::{BoardStyle, render_board};
use tack_ui::terminal::terminal_width;

use super::apply_filter;
use crate::cli::ListArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tack board` command.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let mut session = ctx.open_board()?;
    apply_filter(&mut session.board, &args.filter)?;
    let columns = session.board.columns();

    if ctx.json {
        output_json(&columns);
        return Ok(());
    }

    let style = BoardStyle {
        today: session.board.today(),
        done_column: session.board.done_column(),
        selected: None,
        width: terminal_width(),
    };
    print!("{}", render_board(&columns, &style));
    Ok(())
}
