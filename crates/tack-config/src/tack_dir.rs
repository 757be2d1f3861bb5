//! Discovery and management of the `.tack/` directory.
//!
//! The `.tack/` directory holds a board's configuration, its preferences and
//! its database. This module finds it by walking up the directory tree and
//! creates it when a board is initialised.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the tack metadata directory.
pub const TACK_DIR_NAME: &str = ".tack";

/// The environment variable that can override the tack directory.
pub const TACK_DIR_ENV: &str = "TACK_DIR";

/// File name of the SQLite database inside `.tack/`.
pub const DB_FILE: &str = "tack.db";

/// File name of the preference store inside `.tack/`.
pub const PREFS_FILE: &str = "preferences.yaml";

/// Walk up the directory tree from `start` looking for a `.tack/` directory.
///
/// The `TACK_DIR` environment variable is checked first and wins when it
/// names an existing directory.
pub fn find_tack_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(TACK_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(TACK_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_tack_dir`], but a missing directory is an error.
pub fn find_tack_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_tack_dir(start).ok_or(ConfigError::TackDirNotFound)
}

/// Ensure a `.tack/` directory exists at the given path.
///
/// If `path` itself is not called `.tack`, a `.tack/` subdirectory is created
/// under it. Returns the path to the `.tack/` directory.
pub fn ensure_tack_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let tack_dir = if path.ends_with(TACK_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(TACK_DIR_NAME)
    };

    std::fs::create_dir_all(&tack_dir)?;
    Ok(tack_dir)
}

pub fn db_path(tack_dir: &Path) -> PathBuf {
    tack_dir.join(DB_FILE)
}

pub fn prefs_path(tack_dir: &Path) -> PathBuf {
    tack_dir.join(PREFS_FILE)
}
