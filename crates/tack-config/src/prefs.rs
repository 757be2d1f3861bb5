//! Per-user preferences: column layout, saved filter and task timers.
//!
//! Preferences are read and written through the [`PreferenceStore`] port so
//! the board never touches ambient storage directly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tack_core::column::ColumnSpec;
use tack_core::filter::FilterCriteria;
use tack_core::task::TaskId;

use crate::config::{ConfigError, Result};

/// Time tracked against one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimer {
    /// Set while the timer is running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds accumulated by completed runs.
    #[serde(default)]
    pub accumulated_secs: u64,
}

impl TaskTimer {
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts the timer. Returns `false` if it was already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Stops the timer and banks the running interval. Returns `false` if it
    /// was not running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> bool {
        match self.started_at.take() {
            Some(started) => {
                self.accumulated_secs += running_secs(started, now);
                true
            }
            None => false,
        }
    }

    /// Total tracked seconds, including the current run.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.accumulated_secs + self.started_at.map_or(0, |s| running_secs(s, now))
    }
}

fn running_secs(started: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - started).num_seconds()).unwrap_or(0)
}

/// Everything the board remembers for a user between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Column order and metadata; `None` until the user changes the layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_layout: Option<Vec<ColumnSpec>>,

    /// The saved filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterCriteria>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub timers: BTreeMap<TaskId, TaskTimer>,
}

/// Load/save port for [`Preferences`].
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// Keeps preferences in memory. Used by tests and ephemeral boards.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    prefs: Mutex<Preferences>,
}

impl MemoryPreferenceStore {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            prefs: Mutex::new(prefs),
        }
    }

    /// A copy of the stored preferences.
    pub fn snapshot(&self) -> Preferences {
        self.prefs.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

fn poisoned(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::ReadError(std::io::Error::other(format!("mutex poisoned: {e}")))
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        self.prefs.lock().map(|p| p.clone()).map_err(poisoned)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut stored = self.prefs.lock().map_err(poisoned)?;
        *stored = prefs.clone();
        Ok(())
    }
}

/// Stores preferences as YAML in a file, normally `.tack/preferences.yaml`.
#[derive(Debug, Clone)]
pub struct YamlPreferenceStore {
    path: PathBuf,
}

impl YamlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for YamlPreferenceStore {
    /// A missing or empty file yields default preferences.
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Preferences::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yaml::to_string(prefs)?)?;
        debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
