//! Configuration management for the tack board.
//!
//! This crate loads and saves `.tack/config.yaml`, discovers `.tack/`
//! directories in the filesystem, and provides the per-user preference
//! store (column layout, saved filter, task timers).

pub mod config;
pub mod prefs;
pub mod tack_dir;

pub use config::{ConfigError, OverlayConfig, TackConfig, load_config, save_config};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, Preferences, TaskTimer, YamlPreferenceStore};
