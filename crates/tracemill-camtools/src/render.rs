//! Preview rendering
//!
//! Produces SVG path records for a task: one filled area path for the task's
//! polygons, and outline paths for every offset ring (or a crosshair per hole
//! for drill files). Coordinates are written with two decimals.

use serde::{Deserialize, Serialize};
use tracemill_core::{Bounds, DrillHole, Polygon, PolygonSet, Side, Task, TaskKind};

/// Display units per drawing unit
pub const DEFAULT_SVG_SCALE: f64 = 10.0;

/// What an SVG path represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SvgPathType {
    /// Filled copper or board area
    Area,
    /// Tool path outline
    Outline,
}

/// One `<path>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgPathProps {
    pub path: String,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
    pub file_name: String,
    pub path_type: SvgPathType,
}

/// Task output: geometry, rings and preview paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTask {
    pub task: Task,
    pub polygons: PolygonSet,
    pub drills: Vec<DrillHole>,
    pub offset_paths: Vec<PolygonSet>,
    pub svg_path_props: Vec<SvgPathProps>,
}

impl RenderedTask {
    /// Bounds of the unoffset geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.polygons)
    }

    pub fn ring_count(&self) -> usize {
        self.offset_paths.len()
    }
}

/// Palette name for a task
pub fn color_for(kind: TaskKind, side: Side) -> &'static str {
    match (kind, side) {
        (TaskKind::EdgeCut, _) => "edgecut",
        (TaskKind::Drill, _) => "drill",
        (TaskKind::Drawing, _) => "drawing",
        (_, Side::Top) => "top",
        (_, Side::Bottom) => "bottom",
        (_, Side::Other) => "drawing",
    }
}

/// Converts geometry into path records at a fixed display scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgRenderer {
    svg_scale: f64,
    geometry_scale: f64,
}

impl SvgRenderer {
    pub fn new(svg_scale: f64, geometry_scale: f64) -> Self {
        Self {
            svg_scale,
            geometry_scale,
        }
    }

    pub fn area_stroke(&self) -> String {
        format!("{:.2}", 0.01 * self.svg_scale)
    }

    pub fn offset_stroke(&self, kind: TaskKind) -> String {
        let width = match kind {
            TaskKind::EdgeCut => 0.1,
            TaskKind::Isolation => 0.015,
            TaskKind::Drill => 0.025,
            TaskKind::Drawing => return "0".to_string(),
        };
        format!("{:.2}", width * self.svg_scale)
    }

    fn svg_point(command: char, x: f64, y: f64) -> String {
        format!("{}{:.2} {:.2}", command, x, y)
    }

    /// One path string per polygon.
    pub fn polygons_to_paths(&self, polygons: &[Polygon]) -> Vec<String> {
        let factor = self.svg_scale / self.geometry_scale;
        polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let command = if i == 0 { 'M' } else { 'L' };
                        Self::svg_point(command, p.x as f64 * factor, p.y as f64 * factor)
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// A plus sign spanning the hole's diameter.
    pub fn drill_crosshair(&self, hole: &DrillHole) -> String {
        let x = self.svg_scale * hole.cx;
        let y = self.svg_scale * hole.cy;
        let r = self.svg_scale * hole.r;
        [
            Self::svg_point('M', x - r, y),
            Self::svg_point('L', x + r, y),
            Self::svg_point('M', x, y - r),
            Self::svg_point('L', x, y + r),
        ]
        .join(" ")
    }

    /// The filled area of a task's geometry, as a single record.
    pub fn area_props(&self, task: &Task, polygons: &[Polygon]) -> SvgPathProps {
        let color = color_for(task.kind, task.side);
        SvgPathProps {
            path: self.polygons_to_paths(polygons).join("\n"),
            fill: format!("var(--color-fill-{})", color),
            stroke: format!("var(--color-stroke-{})", color),
            stroke_width: self.area_stroke(),
            file_name: task.file_name.clone(),
            path_type: SvgPathType::Area,
        }
    }

    /// Tool path records: crosshairs for drill tasks, one record per ring
    /// polygon otherwise.
    pub fn outline_props(
        &self,
        task: &Task,
        offset_paths: &[PolygonSet],
        drills: &[DrillHole],
    ) -> Vec<SvgPathProps> {
        let color = color_for(task.kind, task.side);
        let outline = |path: String| SvgPathProps {
            path,
            fill: "none".to_string(),
            stroke: format!("var(--color-path-{})", color),
            stroke_width: self.offset_stroke(task.kind),
            file_name: task.file_name.clone(),
            path_type: SvgPathType::Outline,
        };

        if task.kind == TaskKind::Drill {
            return drills
                .iter()
                .map(|hole| outline(self.drill_crosshair(hole)))
                .collect();
        }

        offset_paths
            .iter()
            .flat_map(|ring| self.polygons_to_paths(ring))
            .map(outline)
            .collect()
    }
}
