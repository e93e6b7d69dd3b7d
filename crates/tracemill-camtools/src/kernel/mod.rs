//! Polygon geometry kernel
//!
//! Turns a [`PlotTree`] into the filled [`PolygonSet`] a task cares about:
//! pads and traces for isolation routing, the stitched outline for edge cuts,
//! and drill hits (plus their footprint) for drill files.
//!
//! All geometry is scaled by `scale × PRECISION` and rounded onto an integer grid
//! before the boolean union, which keeps the union free of floating point
//! degeneracies.

pub mod arc;
pub mod shapes;
pub mod stitch;
pub mod union;

use crate::error::{CamToolError, CamToolResult};
use tracemill_core::{
    DrillHole, PathSegment, PlotNode, PlotTree, Point, PointF, Polygon, PolygonSet, Polyline,
    Shape, TaskKind, SAME_POINT_EPSILON,
};
use tracing::{debug, warn};

pub use arc::{arc_point_count, create_arc, ARC_TOLERANCE};
pub use stitch::stitch_polylines;
pub use union::{fill_rule_for, union_polygons};

/// Sub-unit resolution multiplier applied on top of the user scale.
pub const PRECISION: f64 = 1000.0;
/// Default user scale.
pub const DEFAULT_SCALE: f64 = 60.0;
/// Corner radius floor for rectangles, the radius of the smallest tool.
pub const DEFAULT_MINIMUM_RADIUS: f64 = 0.05;

/// Stroke width used when a path does not declare one.
const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Accumulates one task's polygons and merges them on [`Transformer::result`].
#[derive(Debug, Clone)]
pub struct Transformer {
    scale: f64,
    minimum_radius: f64,
    subjects: Vec<Polygon>,
    edge_polylines: Vec<Polyline>,
    drills: Vec<DrillHole>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE, DEFAULT_MINIMUM_RADIUS)
    }
}

impl Transformer {
    pub fn new(scale: f64, minimum_radius: f64) -> Self {
        Self {
            scale: scale * PRECISION,
            minimum_radius,
            subjects: Vec::new(),
            edge_polylines: Vec::new(),
            drills: Vec::new(),
        }
    }

    /// Integer units per drawing unit.
    pub fn geometry_scale(&self) -> f64 {
        self.scale
    }

    /// Drill hits collected by the last drill run.
    pub fn drill_holes(&self) -> &[DrillHole] {
        &self.drills
    }

    /// Convert every primitive of `tree`, replacing anything from a previous run.
    pub fn run(&mut self, tree: &PlotTree, kind: TaskKind) -> CamToolResult<()> {
        self.subjects.clear();
        self.edge_polylines.clear();
        self.drills.clear();

        for node in &tree.children {
            match node {
                PlotNode::Shape { shape } => self.draw_shape(shape, kind)?,
                PlotNode::Path { width, segments } => self.draw_path(*width, segments, kind)?,
                PlotNode::Region { segments } => self.draw_region(segments)?,
                PlotNode::Unknown => warn!("Skipping unsupported plot node"),
            }
        }

        if kind == TaskKind::EdgeCut {
            let polylines = std::mem::take(&mut self.edge_polylines);
            let loops = stitch_polylines(polylines, SAME_POINT_EPSILON);
            debug!("Stitched outline into {} loops", loops.len());
            for polyline in loops {
                self.add_polygon(&polyline, true)?;
            }
        }

        Ok(())
    }

    /// Merge the accumulated polygons with the fill rule for `kind`.
    pub fn result(&self, kind: TaskKind) -> CamToolResult<PolygonSet> {
        union_polygons(&self.subjects, fill_rule_for(kind))
    }

    fn draw_shape(&mut self, shape: &Shape, kind: TaskKind) -> CamToolResult<()> {
        match shape {
            Shape::Rectangle {
                x,
                y,
                x_size,
                y_size,
                r,
            } => {
                let outline = shapes::rectangle(*x, *y, *x_size, *y_size, *r, self.minimum_radius);
                self.add_polygon(&outline, false)
            }
            Shape::Circle { cx, cy, r } => {
                if kind == TaskKind::Drill {
                    self.drills.push(DrillHole::new(*cx, *cy, *r));
                }
                self.add_polygon(&shapes::circle(*cx, *cy, *r), false)
            }
            Shape::Polygon { points } => match shapes::polygon(points) {
                Some(outline) => self.add_polygon(&outline, false),
                None => Ok(()),
            },
            Shape::Layered { shapes } => {
                for shape in shapes {
                    self.draw_shape(shape, kind)?;
                }
                Ok(())
            }
            Shape::Unknown => {
                warn!("Skipping unsupported shape");
                Ok(())
            }
        }
    }

    fn draw_path(&mut self, width: f64, segments: &[PathSegment], kind: TaskKind) -> CamToolResult<()> {
        let width = if width > 0.0 { width } else { DEFAULT_STROKE_WIDTH };

        for segment in segments {
            match (segment, kind) {
                (PathSegment::Line { start, end }, TaskKind::EdgeCut) => {
                    self.edge_polylines
                        .push(vec![PointF::from(*start), PointF::from(*end)]);
                }
                (PathSegment::Line { start, end }, _) => {
                    self.add_polygon(&shapes::line_capsule(*start, *end, width), false)?;
                }
                (
                    PathSegment::Arc {
                        start,
                        end,
                        center,
                        radius,
                    },
                    TaskKind::EdgeCut,
                ) => {
                    let mut polyline = vec![PointF::new(start[0], start[1])];
                    polyline.extend(create_arc(center[0], center[1], *radius, start[2], end[2]));
                    polyline.push(PointF::new(end[0], end[1]));
                    self.edge_polylines.push(polyline);
                }
                (
                    PathSegment::Arc {
                        start,
                        end,
                        center,
                        radius,
                    },
                    _,
                ) => {
                    let outline = shapes::arc_capsule(*center, *radius, start[2], end[2], width);
                    self.add_polygon(&outline, false)?;
                }
                (PathSegment::Unknown, _) => warn!("Skipping unsupported path segment"),
            }
        }

        Ok(())
    }

    fn draw_region(&mut self, segments: &[PathSegment]) -> CamToolResult<()> {
        let mut outline: Polyline = Vec::new();

        for segment in segments {
            if outline.is_empty() {
                if let Some(start) = segment.start_point() {
                    outline.push(PointF::from(start));
                }
            }
            match segment {
                PathSegment::Line { end, .. } => outline.push(PointF::from(*end)),
                PathSegment::Arc {
                    start,
                    end,
                    center,
                    radius,
                } => {
                    outline.extend(create_arc(center[0], center[1], *radius, start[2], end[2]));
                    outline.push(PointF::new(end[0], end[1]));
                }
                PathSegment::Unknown => warn!("Skipping unsupported region segment"),
            }
        }

        if let Some(&first) = outline.first() {
            outline.push(first);
        }
        if outline.len() > 2 {
            self.add_polygon(&outline, false)?;
        }
        Ok(())
    }

    /// Scale, round and queue `polyline` for the union.
    ///
    /// Unless `keep_chirality` is set the polygon is turned to the outer winding.
    fn add_polygon(&mut self, polyline: &[PointF], keep_chirality: bool) -> CamToolResult<()> {
        if polyline.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(CamToolError::GeometryError(
                "non-finite coordinate in drawing".to_string(),
            ));
        }

        let mut polygon: Polygon = polyline
            .iter()
            .map(|&p| Point::from_scaled(p, self.scale))
            .collect();

        if polygon.without_repeats().len() < 3 {
            return Ok(());
        }

        if !keep_chirality && !polygon.is_outer() {
            polygon.reverse();
        }
        self.subjects.push(polygon);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracemill_core::Units;

    fn tree(children: Vec<PlotNode>) -> PlotTree {
        PlotTree {
            units: Units::Millimeters,
            children,
        }
    }

    #[test]
    fn test_geometry_scale() {
        assert_eq!(Transformer::default().geometry_scale(), 60_000.0);
        assert_eq!(Transformer::new(1.0, 0.0).geometry_scale(), 1000.0);
    }

    #[test]
    fn test_drill_run_collects_holes() {
        let mut transformer = Transformer::default();
        let plot = tree(vec![PlotNode::Shape {
            shape: Shape::Layered {
                shapes: vec![
                    Shape::Circle { cx: 1.0, cy: 1.0, r: 0.4 },
                    Shape::Circle { cx: 3.0, cy: 1.0, r: 0.6 },
                ],
            },
        }]);

        transformer.run(&plot, TaskKind::Drill).unwrap();
        assert_eq!(transformer.drill_holes().len(), 2);
        assert_eq!(transformer.result(TaskKind::Drill).unwrap().len(), 2);

        // a new run starts from scratch
        transformer.run(&tree(vec![]), TaskKind::Drill).unwrap();
        assert!(transformer.drill_holes().is_empty());
    }

    #[test]
    fn test_non_finite_input_is_a_geometry_error() {
        let mut transformer = Transformer::default();
        let plot = tree(vec![PlotNode::Shape {
            shape: Shape::Circle { cx: f64::NAN, cy: 0.0, r: 1.0 },
        }]);
        let err = transformer.run(&plot, TaskKind::Isolation).unwrap_err();
        assert!(matches!(err, CamToolError::GeometryError(_)));
    }

    #[test]
    fn test_unknown_nodes_are_skipped() {
        let mut transformer = Transformer::default();
        let plot = tree(vec![
            PlotNode::Unknown,
            PlotNode::Shape { shape: Shape::Unknown },
            PlotNode::Shape {
                shape: Shape::Rectangle { x: 0.0, y: 0.0, x_size: 1.0, y_size: 1.0, r: None },
            },
        ]);
        transformer.run(&plot, TaskKind::Isolation).unwrap();
        assert_eq!(transformer.result(TaskKind::Isolation).unwrap().len(), 1);
    }
}
