//! Configuration for TraceMill runs
//!
//! Supports JSON and TOML files. Sections:
//! - Geometry (scale, minimum corner radius)
//! - Output (render-only mode, output directory, preview scale)
//! - Machining parameters per task kind
//! - Task defaults (offset steps and spacing) per task kind

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracemill_camtools::{
    MachiningOperations, DEFAULT_MINIMUM_RADIUS, DEFAULT_SCALE, DEFAULT_SVG_SCALE,
};
use tracemill_core::{Task, TaskKind};
use tracing::debug;

/// Offset ring defaults for one task kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskDefaults {
    /// Number of offset rings
    pub steps: u32,
    /// Ring spacing in drawing units
    pub offset: f64,
}

impl TaskDefaults {
    pub fn for_kind(kind: TaskKind) -> Self {
        Self {
            steps: kind.default_steps(),
            offset: kind.default_offset(),
        }
    }
}

/// Task defaults for every kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefaultsSettings {
    pub isolation: TaskDefaults,
    pub edge_cut: TaskDefaults,
    pub drill: TaskDefaults,
    pub drawing: TaskDefaults,
}

impl Default for TaskDefaultsSettings {
    fn default() -> Self {
        Self {
            isolation: TaskDefaults::for_kind(TaskKind::Isolation),
            edge_cut: TaskDefaults::for_kind(TaskKind::EdgeCut),
            drill: TaskDefaults::for_kind(TaskKind::Drill),
            drawing: TaskDefaults::for_kind(TaskKind::Drawing),
        }
    }
}

impl TaskDefaultsSettings {
    pub fn get(&self, kind: TaskKind) -> TaskDefaults {
        match kind {
            TaskKind::Isolation => self.isolation,
            TaskKind::EdgeCut => self.edge_cut,
            TaskKind::Drill => self.drill,
            TaskKind::Drawing => self.drawing,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceMillConfig {
    /// User scale; geometry uses `scale × 1000` integer units per drawing unit
    pub scale: f64,
    /// Corner radius floor for rectangles
    pub minimum_radius: f64,
    /// Display units per drawing unit for SVG previews
    pub svg_scale: f64,
    /// Emit only motion and comment lines
    pub render_only_paths: bool,
    /// Where programs are written; next to the inputs when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,
    pub machining: MachiningOperations,
    pub tasks: TaskDefaultsSettings,
}

impl Default for TraceMillConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            minimum_radius: DEFAULT_MINIMUM_RADIUS,
            svg_scale: DEFAULT_SVG_SCALE,
            render_only_paths: false,
            output_directory: None,
            machining: MachiningOperations::default(),
            tasks: TaskDefaultsSettings::default(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl TraceMillConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(SettingsError::invalid("scale", "must be > 0"));
        }
        if !(self.minimum_radius.is_finite() && self.minimum_radius >= 0.0) {
            return Err(SettingsError::invalid("minimum_radius", "must be >= 0"));
        }
        if !(self.svg_scale.is_finite() && self.svg_scale > 0.0) {
            return Err(SettingsError::invalid("svg_scale", "must be > 0"));
        }

        for kind in TaskKind::ALL {
            let defaults = self.tasks.get(kind);
            if !(defaults.offset.is_finite() && defaults.offset >= 0.0) {
                return Err(SettingsError::invalid(
                    format!("tasks.{}.offset", kind),
                    "must be >= 0",
                ));
            }
        }

        self.machining.validate()?;
        Ok(())
    }

    /// Apply the configured ring defaults for the task's kind.
    pub fn apply_task_defaults(&self, task: Task) -> Task {
        let defaults = self.tasks.get(task.kind);
        task.with_steps(defaults.steps).with_offset(defaults.offset)
    }
}

/// Platform config location, `<config dir>/tracemill/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tracemill").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = TraceMillConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.scale, 60.0);
        assert_eq!(config.tasks.get(TaskKind::EdgeCut).offset, 1.5);
    }

    #[test]
    fn test_invalid_values() {
        let config = TraceMillConfig {
            scale: 0.0,
            ..TraceMillConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));

        let mut config = TraceMillConfig::default();
        config.machining.isolation.step_depth = 0.0;
        assert!(matches!(config.validate(), Err(SettingsError::Parameter(_))));
    }

    #[test]
    fn test_apply_task_defaults() {
        let mut config = TraceMillConfig::default();
        config.tasks.isolation = TaskDefaults {
            steps: 3,
            offset: 0.1,
        };
        let task = config.apply_task_defaults(Task::new("top.gtl", "", TaskKind::Isolation));
        assert_eq!(task.steps, 3);
        assert_eq!(task.offset, 0.1);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = TraceMillConfig::default()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
    }
}
