//! Plot primitive tree
//!
//! The boundary between drawing-format parsers and the geometry kernel. A plotter
//! turns raw drawing text into a [`PlotTree`] of shapes, stroked paths and filled
//! regions, all in drawing-unit floating point coordinates.
//!
//! The serde representation is internally tagged by `type`. Variants a parser may
//! produce but the kernel does not understand deserialize to `Unknown` so that
//! they can be logged and skipped instead of failing the whole tree.

use crate::error::Result;
use crate::units::Units;
use serde::{Deserialize, Serialize};

/// Root of a plotted drawing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotTree {
    pub units: Units,
    #[serde(default)]
    pub children: Vec<PlotNode>,
}

impl PlotTree {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: PlotNode) {
        self.children.push(node);
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A top level primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlotNode {
    /// A stamped pad or flash
    #[serde(alias = "imageShape")]
    Shape { shape: Shape },

    /// A stroked trace
    #[serde(alias = "imagePath")]
    Path {
        width: f64,
        #[serde(default)]
        segments: Vec<PathSegment>,
    },

    /// A filled outline
    #[serde(alias = "imageRegion")]
    Region {
        #[serde(default)]
        segments: Vec<PathSegment>,
    },

    #[serde(other)]
    Unknown,
}

/// Stamp shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    /// Axis aligned rectangle with its lower left corner at `(x, y)`
    Rectangle {
        x: f64,
        y: f64,
        #[serde(rename = "xSize")]
        x_size: f64,
        #[serde(rename = "ySize")]
        y_size: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<f64>,
    },

    Circle { cx: f64, cy: f64, r: f64 },

    Polygon { points: Vec<[f64; 2]> },

    /// Composite of other shapes
    #[serde(rename = "layeredShape", alias = "layered")]
    Layered { shapes: Vec<Shape> },

    #[serde(other)]
    Unknown,
}

/// Segments of a path or region outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PathSegment {
    Line { start: [f64; 2], end: [f64; 2] },

    /// Circular arc; `start` and `end` carry `[x, y, angle]`
    Arc {
        start: [f64; 3],
        end: [f64; 3],
        center: [f64; 2],
        radius: f64,
    },

    #[serde(other)]
    Unknown,
}

impl PathSegment {
    pub fn start_point(&self) -> Option<[f64; 2]> {
        match self {
            Self::Line { start, .. } => Some(*start),
            Self::Arc { start, .. } => Some([start[0], start[1]]),
            Self::Unknown => None,
        }
    }

    pub fn end_point(&self) -> Option<[f64; 2]> {
        match self {
            Self::Line { end, .. } => Some(*end),
            Self::Arc { end, .. } => Some([end[0], end[1]]),
            Self::Unknown => None,
        }
    }
}
