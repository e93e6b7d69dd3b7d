//! Program assembly
//!
//! Wraps generated bodies in spindle control, tool changes and the program
//! envelope, and produces the final text of a task's G-code file.

use super::context::MachiningContext;
use super::contours::generate_contours;
use super::drills::generate_drills;
use super::params::MachiningParams;
use crate::error::{CamToolError, CamToolResult};
use crate::render::RenderedTask;
use tracemill_core::TaskKind;

/// Run `lines` with the spindle on.
pub fn with_motor(lines: Vec<String>, ctx: &MachiningContext) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len() + 4);
    out.push(format!("M3 S{}", ctx.spindle_speed));
    out.push("G4 P2".to_string());
    out.extend(lines);
    out.push("M5".to_string());
    out.push("G4 P2".to_string());
    out
}

/// Move home, pause for the operator to swap tools, then run `lines` with the spindle on.
pub fn with_tool_change(message: &str, lines: Vec<String>, ctx: &MachiningContext) -> Vec<String> {
    let mut out = vec![
        format!("G0 {}", ctx.home()),
        format!("M0 tool change required - {}", message),
        format!("G0 Z{}", ctx.clearance_height),
    ];
    out.extend(with_motor(lines, ctx));
    out.push(format!("G0 Z{}", ctx.safe_height));
    out
}

/// Program preamble and postamble: absolute XY-plane moves in the task's
/// units, starting and ending at home above the work.
pub fn with_envelope(lines: Vec<String>, ctx: &MachiningContext) -> Vec<String> {
    let home = format!("G0 {}", ctx.home());
    let mut out = vec![
        "G90".to_string(),
        "G17".to_string(),
        ctx.units.gcode().to_string(),
        "G94".to_string(),
        format!("G0 Z{}", ctx.safe_height),
        home.clone(),
        String::new(),
        String::new(),
    ];
    out.extend(lines);
    out.push(String::new());
    out.push(String::new());
    out.push(home);
    out.push("M30".to_string());
    out
}

/// Keep only motion lines and comments, for previewing toolpaths.
pub fn render_only_paths(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| line.starts_with("G0 ") || line.starts_with("G1 ") || line.starts_with('('))
        .collect()
}

/// Complete program text for one task.
///
/// Drill tasks drill their holes; isolation and outline tasks mill all of
/// their offset rings. Drawing layers have no program. With `render_only`
/// set the program is reduced to motion and comments and loses its `%`
/// delimiters.
pub fn generate_program(
    task: &RenderedTask,
    params: &MachiningParams,
    geometry_scale: f64,
    render_only: bool,
) -> CamToolResult<String> {
    let ctx = MachiningContext::new(params, task.task.flip, geometry_scale)?;

    let body = match task.task.kind {
        TaskKind::Drill => generate_drills(&task.drills, &ctx),
        TaskKind::Drawing => {
            return Err(CamToolError::GenerationFailed(format!(
                "{} is a drawing layer and is not milled",
                task.task.file_name
            )));
        }
        _ => {
            let contours: Vec<_> = task.offset_paths.iter().flatten().cloned().collect();
            generate_contours(&contours, &ctx)
        }
    };

    let description = format!("({} {})", task.task.kind, task.task.file_name);
    let mut lines = vec![description];
    lines.extend(with_envelope(body, &ctx));

    tracing::debug!(
        "Generated {} program for {} ({} lines)",
        task.task.kind,
        task.task.file_name,
        lines.len()
    );

    if render_only {
        return Ok(render_only_paths(lines).join("\n"));
    }

    let mut gcode = String::from("%\n");
    gcode.push_str(&lines.join("\n"));
    gcode.push_str("\n%\n");
    Ok(gcode)
}
