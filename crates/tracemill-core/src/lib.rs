//! # TraceMill Core
//!
//! Core types, units and errors shared by the TraceMill crates.
//! Provides the integer polygon model used by the geometry kernel, the
//! task description consumed by the pipeline, and the plot primitive tree
//! produced by drawing plotters.

pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod plot;
pub mod task;
pub mod types;
pub mod units;

pub use error::{Error, ParameterError, Result};
pub use fingerprint::Fingerprint;
pub use geometry::{
    same_point, Bounds, Containment, DrillHole, Point, PointF, Polygon, PolygonSet, Polyline,
    SAME_POINT_EPSILON,
};
pub use plot::{PathSegment, PlotNode, PlotTree, Shape};
pub use task::{identify_layer, Flip, LayerIdentity, LayerType, Side, Task, TaskKind};
pub use types::{thread_safe, ProgressCallback, ThreadSafe};
pub use units::Units;
