//! Command handlers, one module per subcommand.

pub mod board;
pub mod bulk;
pub mod column;
pub mod completion;
pub mod create;
pub mod init;
pub mod list;
pub mod move_cmd;
pub mod quick;
pub mod show;
pub mod task;
pub mod timer;

use anyhow::Result;

use tack_board::Board;
use tack_storage::PersistenceAdapter;

use crate::cli::FilterArgs;

/// Installs the filter described by the flags, starting from the saved
/// filter under `--saved`, and stores it under `--save`.
pub(crate) fn apply_filter<A: PersistenceAdapter>(board: &mut Board<A>, args: &FilterArgs) -> Result<()> {
    if args.saved && !board.restore_saved_filter()? {
        tracing::warn!("no saved filter, using flags only");
    }
    let criteria = args.apply_to(board.filter().clone());
    board.set_filter(criteria);
    if args.save {
        board.save_filter()?;
    }
    Ok(())
}
