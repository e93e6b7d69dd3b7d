//! Contour milling
//!
//! Each contour is cut in as many Z passes as the context asks for, walking
//! every vertex of the ring at the XY feed rate.

use super::context::MachiningContext;
use super::program::with_tool_change;
use tracemill_core::Polygon;

/// Z passes for one contour. Empty contours produce no lines.
pub fn contour_z_passes(contour: &Polygon, ctx: &MachiningContext) -> Vec<String> {
    let Some(&start) = contour.first() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for pass in 1..=ctx.z_passes {
        let depth = ctx.pass_depth(pass);
        lines.push(format!("(Z Pass {}: Depth {:.3})", pass, depth));
        lines.push(format!("G0 {}", ctx.scaled_point(start)));
        lines.push(format!("G1 Z{:.3} F{}", depth, ctx.plunge_speed));
        for &point in contour.iter() {
            lines.push(format!("G1 {} F{}", ctx.scaled_point(point), ctx.feed_rate_xy));
        }
        lines.push(format!("G0 Z{}", ctx.work_height()));
    }
    lines.push(format!("G0 Z{}", ctx.clearance_height));
    lines
}

/// Cut every contour after a single bit change.
pub fn generate_contours(contours: &[Polygon], ctx: &MachiningContext) -> Vec<String> {
    let mut body = Vec::new();
    for (i, contour) in contours.iter().filter(|c| !c.is_empty()).enumerate() {
        body.push(String::new());
        body.push(format!("(Contour {})", i + 1));
        body.push(format!("G0 Z{}", ctx.clearance_height));
        body.extend(contour_z_passes(contour, ctx));
        body.push(format!("G0 Z{}", ctx.clearance_height));
    }

    let mut lines = with_tool_change("Insert bit/engraver", body, ctx);
    lines.push(format!("G0 Z{}", ctx.safe_height));
    lines
}
