//! Offset engine
//!
//! Grows or shrinks polygon sets ring by ring to model the footprint of a rotating
//! tool, and clips the resulting toolpaths to the physical board.

use crate::error::{CamToolError, CamToolResult};
use crate::kernel::union_polygons;
use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use i_overlay::core::fill_rule::FillRule;
use serde::Serialize;
use std::panic;
use tracemill_core::{Containment, Point, Polygon, PolygonSet, TaskKind};
use tracing::warn;

/// Maximum distance, in drawing units, between a rounded join and its chords.
pub const DEFAULT_ARC_ERROR: f64 = 0.001;

/// Grow (`distance > 0`) or shrink (`distance < 0`) a polygon set.
///
/// `distance` and `tolerance` are in integer units. Joins are rounded. Outer loops
/// move outward and holes shrink for a positive distance; overlapping growth is
/// merged. Every output polygon is explicitly closed.
pub fn offset_polygons(set: &[Polygon], distance: f64, tolerance: f64) -> CamToolResult<PolygonSet> {
    if distance == 0.0 {
        return Ok(set.iter().cloned().map(Polygon::closed).collect());
    }
    if !distance.is_finite() {
        return Err(CamToolError::GeometryError(format!(
            "invalid offset distance {}",
            distance
        )));
    }

    let mut pieces: Vec<Polygon> = Vec::new();
    for polygon in set {
        let polygon = polygon.without_repeats();
        if polygon.len() < 3 {
            continue;
        }

        let mut pline: Polyline<f64> = Polyline::new();
        for p in polygon.iter() {
            pline.add_vertex(PlineVertex::new(p.x as f64, p.y as f64, 0.0));
        }
        pline.set_is_closed(true);

        // positive cavalier offsets go left of the tangent, which is inward for
        // an outer (counter-clockwise) loop and into the material for a hole
        let offsets = panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(-distance)))
            .map_err(|_| CamToolError::GeometryError("polygon offset failed".to_string()))?;

        for offset in offsets {
            let lines = match offset.arcs_to_approx_lines(tolerance) {
                Some(lines) => lines,
                None => {
                    warn!("Could not approximate offset arcs, using raw vertices");
                    offset
                }
            };
            let piece: Polygon = lines
                .iter_vertexes()
                .map(|v| Point::new(v.x.round() as i64, v.y.round() as i64))
                .collect();
            pieces.push(piece);
        }
    }

    // Outer loops wind counter-clockwise and holes clockwise. i_overlay counts
    // counter-clockwise as negative winding, so material is the negative fill;
    // a hole grown past its shrunken outer then cancels it instead of filling.
    let merged = union_polygons(&pieces, FillRule::Negative)?;
    Ok(merged.into_iter().map(Polygon::closed).collect())
}

/// True if `point` is inside at least one outer board loop and inside no hole.
///
/// Points on a boundary count as inside that loop.
pub fn is_point_inside_board(point: Point, board: &[Polygon]) -> bool {
    let mut inside_outer = false;
    for polygon in board {
        if polygon.containment(point) != Containment::Outside {
            if polygon.is_outer() {
                inside_outer = true;
            } else {
                return false;
            }
        }
    }
    inside_outer
}

/// Drop every point outside the board, splitting paths where points were removed.
///
/// The resulting pieces are open paths; paths with no point inside disappear.
pub fn filter_inside_board(polygons: &[Polygon], board: &[Polygon]) -> PolygonSet {
    let mut result = Vec::new();
    for polygon in polygons {
        let mut current: Vec<Point> = Vec::new();
        for &point in polygon.iter() {
            if is_point_inside_board(point, board) {
                current.push(point);
            } else if !current.is_empty() {
                result.push(Polygon::new(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            result.push(Polygon::new(current));
        }
    }
    result
}

/// Everything that determines a task's ring sequence; also its cache key.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetRequest<'a> {
    pub steps: u32,
    /// Ring spacing in drawing units
    pub distance: f64,
    pub polygons: &'a [Polygon],
    pub kind: TaskKind,
    /// Unoffset edge-cut polygons, when the batch has a board outline
    pub board: Option<&'a [Polygon]>,
    /// Integer units per drawing unit
    pub scale: f64,
}

impl<'a> OffsetRequest<'a> {
    /// Number of rings this request produces.
    ///
    /// A zero distance produces a single (closed, unmoved) ring.
    pub fn ring_count(&self) -> u32 {
        match (self.steps, self.distance == 0.0) {
            (0, _) => 0,
            (_, true) => 1,
            (steps, false) => steps,
        }
    }

    /// Iterate the rings one at a time.
    pub fn rings(&self) -> OffsetRings<'a> {
        OffsetRings {
            request: self.clone(),
            current: self.polygons.to_vec(),
            produced: 0,
            total: self.ring_count(),
        }
    }
}

/// Lazily computed ring sequence; ring `k` is the offset of ring `k - 1`.
pub struct OffsetRings<'a> {
    request: OffsetRequest<'a>,
    current: PolygonSet,
    produced: u32,
    total: u32,
}

impl<'a> Iterator for OffsetRings<'a> {
    type Item = CamToolResult<PolygonSet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced >= self.total {
            return None;
        }
        self.produced += 1;

        let scale = self.request.scale;
        let next = match offset_polygons(
            &self.current,
            self.request.distance * scale,
            DEFAULT_ARC_ERROR * scale,
        ) {
            Ok(next) => next,
            Err(err) => {
                self.produced = self.total;
                return Some(Err(err));
            }
        };

        // the unfiltered ring feeds the next step
        let ring = match self.request.board {
            Some(board) if self.request.kind != TaskKind::EdgeCut => {
                filter_inside_board(&next, board)
            }
            _ => next.clone(),
        };
        self.current = next;
        Some(Ok(ring))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.produced) as usize;
        (remaining, Some(remaining))
    }
}

/// Compute every ring of `request`.
pub fn create_offset_rings(request: &OffsetRequest<'_>) -> CamToolResult<Vec<PolygonSet>> {
    request.rings().collect()
}
