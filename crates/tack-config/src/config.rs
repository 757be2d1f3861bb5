//! Configuration types and loading for the tack board.
//!
//! The main entry point is [`TackConfig`], which represents the contents of
//! `.tack/config.yaml`. Configuration is loaded with [`load_config`], which
//! layers built-in defaults, the YAML file and `TACK_*` environment variables,
//! and saved with [`save_config`].

use std::collections::HashSet;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use tack_core::column::ColumnSpec;

/// File name of the configuration inside `.tack/`.
pub const CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "TACK_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or preference file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// A file contained invalid YAML, or a value failed to serialize.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The merged configuration layers could not be extracted.
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),

    /// The `.tack/` directory was not found.
    #[error("no .tack directory found (run 'tack init' first)")]
    TackDirNotFound,

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Size of the quick-action overlay and its distance from the anchor card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub width: i32,
    pub height: i32,
    pub gap: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 280,
            gap: 8,
        }
    }
}

fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("TODO", "To Do", "#f29668"),
        ColumnSpec::new("IN_PROGRESS", "In Progress", "#59c2ff"),
        ColumnSpec::new("DONE", "Done", "#7fd962"),
    ]
}

// ---------------------------------------------------------------------------
// TackConfig
// ---------------------------------------------------------------------------

/// The contents of `.tack/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TackConfig {
    /// Project whose tasks the board loads.
    pub project: String,

    /// Prefix for task ids issued by the SQLite adapter.
    pub id_prefix: String,

    /// Default column layout, used until the user saves their own.
    pub columns: Vec<ColumnSpec>,

    /// Status whose tasks are never overdue.
    pub done_column: String,

    pub overlay: OverlayConfig,
}

impl Default for TackConfig {
    fn default() -> Self {
        Self {
            project: "default".to_string(),
            id_prefix: "T".to_string(),
            columns: default_columns(),
            done_column: "DONE".to_string(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl TackConfig {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            return Err(ConfigError::invalid("project", "must not be empty"));
        }
        if self.id_prefix.is_empty() || !self.id_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::invalid(
                "id_prefix",
                format!("'{}' must be non-empty and alphanumeric", self.id_prefix),
            ));
        }
        if self.columns.is_empty() {
            return Err(ConfigError::invalid("columns", "at least one column is required"));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.id.trim().is_empty() || column.name.trim().is_empty() {
                return Err(ConfigError::invalid("columns", "column id and name are required"));
            }
            if !seen.insert(column.id.as_str()) {
                return Err(ConfigError::invalid(
                    "columns",
                    format!("duplicate column '{}'", column.id),
                ));
            }
        }
        let overlay = &self.overlay;
        if overlay.width <= 0 || overlay.height <= 0 || overlay.gap < 0 {
            return Err(ConfigError::invalid(
                "overlay",
                "width and height must be positive, gap must not be negative",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

/// The layered configuration sources, lowest precedence first.
pub fn figment(tack_dir: &Path) -> Figment {
    Figment::from(Serialized::defaults(TackConfig::default()))
        .merge(Yaml::file(tack_dir.join(CONFIG_FILE)))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["dir"]))
}

/// Load configuration for the `.tack/` directory at `tack_dir`.
///
/// A missing or empty `config.yaml` yields the defaults (still subject to
/// environment overrides).
///
/// # Errors
///
/// Returns [`ConfigError::Figment`] if a layer holds a value of the wrong
/// type, or [`ConfigError::InvalidValue`] if the merged result is invalid.
pub fn load_config(tack_dir: &Path) -> Result<TackConfig> {
    let config: TackConfig = figment(tack_dir).extract()?;
    config.validate()?;
    debug!(project = %config.project, columns = config.columns.len(), "loaded config");
    Ok(config)
}

/// Save configuration to `config.yaml` inside the given `.tack/` directory.
///
/// The directory is created if it does not exist.
pub fn save_config(tack_dir: &Path, config: &TackConfig) -> Result<()> {
    config.validate()?;
    std::fs::create_dir_all(tack_dir)?;
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(tack_dir.join(CONFIG_FILE), yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        let cfg = TackConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.columns.len(), 3);
        assert_eq!(cfg.done_column, "DONE");
        assert_eq!(cfg.overlay.gap, 8);
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config(jail.directory()).unwrap();
            assert_eq!(cfg, TackConfig::default());
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r##"
project: website
id_prefix: WEB
columns:
  - id: BACKLOG
    name: Backlog
  - id: SHIPPED
    name: Shipped
    color: "#7fd962"
done_column: SHIPPED
overlay:
  width: 300
"##,
            )?;
            let cfg = load_config(jail.directory()).unwrap();
            assert_eq!(cfg.project, "website");
            assert_eq!(cfg.id_prefix, "WEB");
            assert_eq!(cfg.columns[0].color, tack_core::column::DEFAULT_COLUMN_COLOR);
            assert_eq!(cfg.done_column, "SHIPPED");
            assert_eq!(cfg.overlay.width, 300);
            assert_eq!(cfg.overlay.height, 280);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "project: website\n")?;
            jail.set_env("TACK_PROJECT", "mobile");
            jail.set_env("TACK_OVERLAY__GAP", "12");
            let cfg = load_config(jail.directory()).unwrap();
            assert_eq!(cfg.project, "mobile");
            assert_eq!(cfg.overlay.gap, 12);
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "id_prefix: \"T-\"\n")?;
            let err = load_config(jail.directory()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "id_prefix"));
            Ok(())
        });

        let mut cfg = TackConfig::default();
        cfg.columns.push(ColumnSpec::from_status("TODO"));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn wrong_type_is_a_figment_error() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "overlay:\n  width: wide\n")?;
            assert!(matches!(
                load_config(jail.directory()),
                Err(ConfigError::Figment(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let tack_dir = dir.path().join(".tack");
        let cfg = TackConfig {
            project: "ops".into(),
            id_prefix: "OPS".into(),
            ..TackConfig::default()
        };
        save_config(&tack_dir, &cfg).unwrap();
        let content = std::fs::read_to_string(tack_dir.join(CONFIG_FILE)).unwrap();
        assert!(content.contains("id_prefix: OPS"));
        let loaded: TackConfig = serde_yaml::from_str(&content).unwrap();
        assert_eq!(loaded, cfg);
    }
}
