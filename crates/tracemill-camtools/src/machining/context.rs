//! Derived machining context
//!
//! Turns [`MachiningParams`] into the pre-formatted values and coordinate
//! transforms every generator needs.

use super::params::MachiningParams;
use tracemill_core::{Flip, ParameterError, Point, Units};

// Pass counts are computed from floats; a quotient like 1.8 / 0.6 must not round up.
const PASS_EPSILON: f64 = 1e-9;

/// Everything a generator needs to emit lines for one task
#[derive(Debug, Clone, PartialEq)]
pub struct MachiningContext {
    pub units: Units,
    /// -1 when cutting below the work surface, +1 above
    pub z_direction: f64,
    pub z_passes: u32,
    pub total_depth: f64,
    pub step_depth: f64,
    pub work_height: f64,
    pub origin_offset_x: f64,
    pub origin_offset_y: f64,
    pub spindle_speed: String,
    pub plunge_speed: String,
    pub feed_rate_xy: String,
    pub safe_height: String,
    pub clearance_height: String,
    pub flip_x: f64,
    pub flip_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl MachiningContext {
    /// Build the context for a task mirrored by `flip` whose geometry uses
    /// `geometry_scale` integer units per drawing unit.
    pub fn new(
        params: &MachiningParams,
        flip: Flip,
        geometry_scale: f64,
    ) -> Result<Self, ParameterError> {
        params.validate()?;
        if !(geometry_scale.is_finite() && geometry_scale > 0.0) {
            return Err(ParameterError::invalid(
                "geometry_scale",
                "must be a positive number",
            ));
        }

        let z_direction = if params.cut_depth > 0.0 { 1.0 } else { -1.0 };
        let total_depth = params.cut_depth.abs();
        let step_depth = params.step_depth.abs();
        let z_passes = if total_depth == 0.0 {
            0
        } else {
            (total_depth / step_depth - PASS_EPSILON).ceil().max(1.0) as u32
        };

        let (flip_x, flip_y) = flip.factors();

        Ok(Self {
            units: params.units,
            z_direction,
            z_passes,
            total_depth,
            step_depth,
            work_height: params.work_height,
            origin_offset_x: params.origin_offset_x,
            origin_offset_y: params.origin_offset_y,
            spindle_speed: format!("{:.0}", params.spindle_speed),
            plunge_speed: format!("{:.3}", params.plunge_speed),
            feed_rate_xy: format!("{:.3}", params.feed_rate_xy),
            safe_height: format!("{:.3}", params.safe_height),
            clearance_height: format!("{:.3}", params.clearance_height),
            flip_x,
            flip_y,
            scale_x: geometry_scale * flip_x,
            scale_y: geometry_scale * flip_y,
        })
    }

    /// Z for a 1-based pass number, never deeper than the total depth.
    pub fn pass_depth(&self, pass: u32) -> f64 {
        let depth = (pass as f64 * self.step_depth).min(self.total_depth);
        self.z_direction * depth + self.work_height
    }

    pub fn work_height(&self) -> String {
        format!("{:.3}", self.work_height)
    }

    /// Machine coordinates of an integer geometry point as `X.. Y..`.
    pub fn scaled_point(&self, point: Point) -> String {
        format!(
            "X{:.3} Y{:.3}",
            self.origin_offset_x + point.x as f64 / self.scale_x,
            self.origin_offset_y + point.y as f64 / self.scale_y
        )
    }

    /// Machine coordinates of a drawing-unit location as `X.. Y..`.
    pub fn offset_point(&self, x: f64, y: f64) -> String {
        format!(
            "X{:.3} Y{:.3}",
            self.origin_offset_x + x * self.flip_x,
            self.origin_offset_y + y * self.flip_y
        )
    }

    /// The machine origin after offsets.
    pub fn home(&self) -> String {
        self.scaled_point(Point::default())
    }
}
