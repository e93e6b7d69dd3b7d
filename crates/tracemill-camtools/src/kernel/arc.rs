//! Adaptive arc tessellation

use tracemill_core::{PointF, Polyline};

/// Target chord spacing, in drawing units.
pub const ARC_TOLERANCE: f64 = 0.02;
/// Fewest points on any tessellated arc.
pub const MIN_ARC_POINTS: usize = 8;
/// Most points on any tessellated arc.
pub const MAX_ARC_POINTS: usize = 64;

/// Number of points used for an arc: a power of two in `[8, 64]`.
pub fn arc_point_count(radius: f64, start_angle: f64, end_angle: f64) -> usize {
    let arc_length = (end_angle - start_angle).abs() * radius.abs();
    if !arc_length.is_finite() || arc_length <= 0.0 {
        return MIN_ARC_POINTS;
    }

    let estimated = 2f64.powf((arc_length / ARC_TOLERANCE).log2().ceil());
    if estimated >= MAX_ARC_POINTS as f64 {
        MAX_ARC_POINTS
    } else {
        (estimated as usize).max(MIN_ARC_POINTS)
    }
}

/// Points on the arc from `start_angle` to `end_angle`, both ends included.
///
/// The sweep direction follows the sign of `end_angle - start_angle`.
pub fn create_arc(cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) -> Polyline {
    let count = arc_point_count(r, start_angle, end_angle);
    let step = (end_angle - start_angle) / (count - 1) as f64;

    (0..count)
        .map(|i| {
            let angle = start_angle + i as f64 * step;
            PointF::new(cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect()
}
