//! Machining parameters per task kind

use serde::{Deserialize, Serialize};
use tracemill_core::{ParameterError, TaskKind, Units};

/// Upper limit on depth passes (or pecks) per contour
pub const MAX_Z_PASSES: f64 = 1000.0;

/// User-tunable cut parameters for one kind of operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachiningParams {
    pub units: Units,
    /// Machine offset added to every X coordinate
    pub origin_offset_x: f64,
    /// Machine offset added to every Y coordinate
    pub origin_offset_y: f64,
    /// Z for rapid moves between operations
    pub safe_height: f64,
    /// Lower, non-cutting travel Z
    pub clearance_height: f64,
    /// Material surface, usually 0
    pub work_height: f64,
    /// Final depth, negative is below the surface
    pub cut_depth: f64,
    /// Depth increment per pass or peck
    pub step_depth: f64,
    pub feed_rate_xy: f64,
    pub plunge_speed: f64,
    pub retract_speed: f64,
    /// Spindle RPM
    pub spindle_speed: f64,
}

impl Default for MachiningParams {
    fn default() -> Self {
        Self::isolation()
    }
}

impl MachiningParams {
    fn drill() -> Self {
        Self {
            units: Units::Millimeters,
            origin_offset_x: 0.0,
            origin_offset_y: 0.0,
            safe_height: 1.5,
            clearance_height: 0.5,
            work_height: 0.0,
            cut_depth: -1.8,
            step_depth: 0.5,
            feed_rate_xy: 0.0,
            plunge_speed: 80.0,
            retract_speed: 300.0,
            spindle_speed: 10000.0,
        }
    }

    fn isolation() -> Self {
        Self {
            units: Units::Millimeters,
            origin_offset_x: 0.0,
            origin_offset_y: 0.0,
            safe_height: 1.0,
            clearance_height: 0.3,
            work_height: 0.0,
            cut_depth: -0.1,
            step_depth: 0.1,
            feed_rate_xy: 150.0,
            plunge_speed: 100.0,
            retract_speed: 300.0,
            spindle_speed: 16000.0,
        }
    }

    fn edge_cut() -> Self {
        Self {
            units: Units::Millimeters,
            origin_offset_x: 0.0,
            origin_offset_y: 0.0,
            safe_height: 2.0,
            clearance_height: 0.5,
            work_height: 0.0,
            cut_depth: -1.8,
            step_depth: 0.6,
            feed_rate_xy: 300.0,
            plunge_speed: 100.0,
            retract_speed: 300.0,
            spindle_speed: 14000.0,
        }
    }

    /// Check the parameters for values no machine should receive.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let values = [
            ("origin_offset_x", self.origin_offset_x),
            ("origin_offset_y", self.origin_offset_y),
            ("safe_height", self.safe_height),
            ("clearance_height", self.clearance_height),
            ("work_height", self.work_height),
            ("cut_depth", self.cut_depth),
            ("step_depth", self.step_depth),
            ("feed_rate_xy", self.feed_rate_xy),
            ("plunge_speed", self.plunge_speed),
            ("retract_speed", self.retract_speed),
            ("spindle_speed", self.spindle_speed),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ParameterError::invalid(name, "must be a finite number"));
            }
        }

        for (name, value) in [
            ("feed_rate_xy", self.feed_rate_xy),
            ("plunge_speed", self.plunge_speed),
            ("retract_speed", self.retract_speed),
            ("spindle_speed", self.spindle_speed),
        ] {
            if value < 0.0 {
                return Err(ParameterError::OutOfRange {
                    name: name.to_string(),
                    value,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }

        if self.cut_depth != 0.0 && self.step_depth == 0.0 {
            return Err(ParameterError::invalid(
                "step_depth",
                "must not be zero when cut_depth is set",
            ));
        }

        let passes = (self.cut_depth / self.step_depth).abs();
        if self.cut_depth != 0.0 && passes > MAX_Z_PASSES {
            return Err(ParameterError::OutOfRange {
                name: "step_depth".to_string(),
                value: self.step_depth,
                min: self.cut_depth.abs() / MAX_Z_PASSES,
                max: f64::MAX,
            });
        }

        if self.safe_height < self.clearance_height {
            return Err(ParameterError::invalid(
                "safe_height",
                "must not be below clearance_height",
            ));
        }

        Ok(())
    }
}

/// Default machining parameters for a task kind.
///
/// Decorative layers are never milled and have no defaults.
pub fn machining_default_params(kind: TaskKind) -> Result<MachiningParams, ParameterError> {
    match kind {
        TaskKind::Drill => Ok(MachiningParams::drill()),
        TaskKind::Isolation => Ok(MachiningParams::isolation()),
        TaskKind::EdgeCut => Ok(MachiningParams::edge_cut()),
        TaskKind::Drawing => Err(ParameterError::UnknownTaskKind(kind.to_string())),
    }
}

/// Parameters for every millable task kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachiningOperations {
    pub drill: MachiningParams,
    pub isolation: MachiningParams,
    pub edge_cut: MachiningParams,
}

impl Default for MachiningOperations {
    fn default() -> Self {
        machining_default_operations()
    }
}

impl MachiningOperations {
    pub fn get(&self, kind: TaskKind) -> Result<&MachiningParams, ParameterError> {
        match kind {
            TaskKind::Drill => Ok(&self.drill),
            TaskKind::Isolation => Ok(&self.isolation),
            TaskKind::EdgeCut => Ok(&self.edge_cut),
            TaskKind::Drawing => Err(ParameterError::UnknownTaskKind(kind.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        self.drill.validate()?;
        self.isolation.validate()?;
        self.edge_cut.validate()
    }
}

pub fn machining_default_operations() -> MachiningOperations {
    MachiningOperations {
        drill: MachiningParams::drill(),
        isolation: MachiningParams::isolation(),
        edge_cut: MachiningParams::edge_cut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let drill = machining_default_params(TaskKind::Drill).unwrap();
        assert_eq!(drill.cut_depth, -1.8);
        assert_eq!(drill.step_depth, 0.5);
        assert_eq!(drill.spindle_speed, 10000.0);

        let iso = machining_default_params(TaskKind::Isolation).unwrap();
        assert_eq!(iso.feed_rate_xy, 150.0);
        assert_eq!(iso.clearance_height, 0.3);

        let edge = machining_default_params(TaskKind::EdgeCut).unwrap();
        assert_eq!(edge.step_depth, 0.6);
        assert_eq!(edge.safe_height, 2.0);
    }

    #[test]
    fn test_drawing_has_no_defaults() {
        assert_eq!(
            machining_default_params(TaskKind::Drawing),
            Err(ParameterError::UnknownTaskKind("drawing".to_string()))
        );
        assert!(machining_default_operations().get(TaskKind::Drawing).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(machining_default_operations().validate().is_ok());

        let mut params = MachiningParams::default();
        params.step_depth = 0.0;
        assert!(params.validate().is_err());

        params.cut_depth = 0.0;
        assert!(params.validate().is_ok());

        params.feed_rate_xy = -1.0;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_tiny_step_depth_is_rejected() {
        let mut params = machining_default_params(TaskKind::EdgeCut).unwrap();
        params.step_depth = 1e-12;
        assert!(matches!(
            params.validate(),
            Err(ParameterError::OutOfRange { ref name, .. }) if name == "step_depth"
        ));

        // 900 passes is still accepted
        params.step_depth = 0.002;
        assert!(params.validate().is_ok());
    }
}
