//! G-code generation
//!
//! Turns offset rings and drill locations into machine programs. Lines are
//! built as vectors and wrapped outward: passes, tool change, envelope.

pub mod context;
pub mod contours;
pub mod drills;
pub mod params;
pub mod program;

pub use context::MachiningContext;
pub use contours::{contour_z_passes, generate_contours};
pub use drills::{drill_z_passes, generate_drill_group, generate_drills, group_drills};
pub use params::{
    machining_default_operations, machining_default_params, MachiningOperations, MachiningParams,
};
pub use program::{generate_program, render_only_paths, with_envelope, with_motor, with_tool_change};
