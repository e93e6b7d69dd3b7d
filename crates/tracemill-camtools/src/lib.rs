//! # TraceMill CAM Tools
//!
//! Geometry and toolpath generation for PCB milling.
//!
//! ## Modules
//!
//! - **Kernel**: plot primitives to closed, oriented integer polygons (arc
//!   tessellation, capsule strokes, outline stitching, boolean union)
//! - **Offset**: ring by ring offsetting, clipped to the board outline
//! - **Machining**: multi-pass contour and drill G-code with tool changes
//! - **Render**: SVG path records for previews
//!
//! ## Drawing Readers
//!
//! - **Gerber**: RS-274X layers via `gerber_parser`
//! - **Excellon**: drill files
//! - **Plotter**: the trait the pipeline parses through

pub mod error;
pub mod excellon;
pub mod gerber;
pub mod kernel;
pub mod machining;
pub mod offset;
pub mod plotter;
pub mod render;

pub use error::{CamToolError, CamToolResult, FileFormatError};
pub use excellon::ExcellonReader;
pub use gerber::GerberPlotter;
pub use kernel::{Transformer, DEFAULT_MINIMUM_RADIUS, DEFAULT_SCALE, PRECISION};
pub use machining::{
    generate_contours, generate_drills, generate_program, machining_default_operations,
    machining_default_params, MachiningContext, MachiningOperations, MachiningParams,
};
pub use offset::{
    create_offset_rings, filter_inside_board, is_point_inside_board, offset_polygons,
    OffsetRequest, OffsetRings, DEFAULT_ARC_ERROR,
};
pub use plotter::{DrawingPlotter, Plotter};
pub use render::{color_for, RenderedTask, SvgPathProps, SvgPathType, SvgRenderer, DEFAULT_SVG_SCALE};
