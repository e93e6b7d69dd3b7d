//! Boolean union on the integer grid

use crate::error::{CamToolError, CamToolResult};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use std::panic;
use tracemill_core::{Point, Polygon, PolygonSet, TaskKind};

/// Fill rule used when a task's geometry is merged.
///
/// Even-odd keeps board cutouts as holes; non-zero lets overlapping copper merge.
pub fn fill_rule_for(kind: TaskKind) -> FillRule {
    match kind {
        TaskKind::EdgeCut => FillRule::EvenOdd,
        _ => FillRule::NonZero,
    }
}

/// Union all `polygons` as one subject under `fill_rule`.
///
/// Output outer loops have a positive winding and holes a negative one. Loops
/// with fewer than three distinct points are dropped.
pub fn union_polygons(polygons: &[Polygon], fill_rule: FillRule) -> CamToolResult<PolygonSet> {
    let subject: Vec<Vec<[f64; 2]>> = polygons
        .iter()
        .map(Polygon::without_repeats)
        .filter(|p| p.len() >= 3)
        .map(|p| p.iter().map(|pt| [pt.x as f64, pt.y as f64]).collect())
        .collect();

    if subject.is_empty() {
        return Ok(Vec::new());
    }

    let clip = [Vec::<[f64; 2]>::new()];
    let shapes = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        subject.overlay(&clip, OverlayRule::Union, fill_rule)
    }))
    .map_err(|_| CamToolError::GeometryError("boolean union failed".to_string()))?;

    let mut result = Vec::new();
    for shape in shapes {
        for (index, contour) in shape.into_iter().enumerate() {
            let mut polygon: Polygon = contour
                .into_iter()
                .map(|[x, y]| Point::new(x.round() as i64, y.round() as i64))
                .collect();
            polygon = polygon.without_repeats();
            if polygon.len() < 3 {
                continue;
            }

            let should_be_outer = index == 0;
            if polygon.is_outer() != should_be_outer {
                polygon.reverse();
            }
            result.push(polygon);
        }
    }

    Ok(result)
}
