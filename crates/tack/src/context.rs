//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the global flags and knows how to find the
//! board directory and open a [`Board`] over it.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{error, info, warn};

use tack_board::{Board, BoardListener, BoardOptions, Notice, NoticeLevel, SystemClock};
use tack_config::tack_dir::{TACK_DIR_NAME, db_path, find_tack_dir_or_error, prefs_path};
use tack_config::{TackConfig, YamlPreferenceStore, load_config};
use tack_storage::SqliteAdapter;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit board directory from `--dir`.
    pub dir: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,

    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

/// An open board plus the configuration it was opened with.
pub struct Session {
    pub board: Board<SqliteAdapter>,
    pub config: TackConfig,
}

impl RuntimeContext {
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        Self {
            dir: global.dir.clone(),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Where `init` should create the board: `--dir`, else the cwd.
    pub fn init_target(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => env::current_dir().context("failed to get current directory"),
        }
    }

    /// Resolves the `.tack/` directory of an existing board.
    pub fn resolve_tack_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            let candidate = if dir.ends_with(TACK_DIR_NAME) {
                dir.clone()
            } else {
                dir.join(TACK_DIR_NAME)
            };
            if !candidate.is_dir() {
                bail!(
                    "no board found at {}\nHint: run 'tack init' to create one",
                    candidate.display()
                );
            }
            return Ok(candidate);
        }
        let cwd = env::current_dir().context("failed to get current directory")?;
        find_tack_dir_or_error(&cwd).context("no board found. Run 'tack init' to create one.")
    }

    /// Opens the board in the resolved directory and loads the configured
    /// project.
    pub fn open_board(&self) -> Result<Session> {
        let tack_dir = self.resolve_tack_dir()?;
        open_board_at(&tack_dir)
    }
}

/// Opens the SQLite adapter and the preference store under `tack_dir`.
pub fn open_board_at(tack_dir: &Path) -> Result<Session> {
    let config = load_config(tack_dir)
        .with_context(|| format!("failed to load config from {}", tack_dir.display()))?;

    let db = db_path(tack_dir);
    if !db.exists() {
        bail!(
            "no database found at {}\nHint: run 'tack init' to create one",
            db.display()
        );
    }
    let adapter =
        SqliteAdapter::open(&db).with_context(|| format!("failed to open database: {}", db.display()))?;
    if adapter.id_prefix()? != config.id_prefix {
        adapter.set_id_prefix(&config.id_prefix)?;
    }

    let prefs = YamlPreferenceStore::new(prefs_path(tack_dir));
    let mut board = Board::new(
        adapter,
        Box::new(prefs),
        Box::new(SystemClock),
        BoardOptions::from_config(&config),
    );
    board.add_listener(Box::new(NoticeLog));
    board
        .load(&config.project)
        .with_context(|| format!("failed to load project '{}'", config.project))?;
    info!(dir = %tack_dir.display(), project = %config.project, "opened board");
    Ok(Session { board, config })
}

/// Forwards board notices to the log. Failures still reach the user as the
/// command's error.
struct NoticeLog;

impl BoardListener for NoticeLog {
    fn on_notice(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!(message = %notice.message, "board notice"),
            NoticeLevel::Warning => warn!(message = %notice.message, "board notice"),
            NoticeLevel::Error => error!(message = %notice.message, "board notice"),
        }
    }
}
