//! TraceMill Settings Crate
//!
//! Loads, validates and saves the configuration that drives a run: geometry
//! scale, per-kind machining parameters and per-kind task defaults.

pub mod config;
pub mod error;

pub use config::{default_config_path, TaskDefaults, TaskDefaultsSettings, TraceMillConfig};
pub use error::{SettingsError, SettingsResult};
