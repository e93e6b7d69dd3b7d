//! Drilling
//!
//! Holes are grouped by diameter so every bit is changed exactly once, then
//! pecked in Z passes.

use super::context::MachiningContext;
use super::program::with_tool_change;
use indexmap::IndexMap;
use tracemill_core::DrillHole;

/// Peck cycle for a single hole.
pub fn drill_z_passes(hole: &DrillHole, ctx: &MachiningContext) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "(drill {}{} at {} - {} passes)",
            hole.diameter(),
            ctx.units,
            ctx.offset_point(hole.cx, hole.cy),
            ctx.z_passes
        ),
        format!("G0 {}", ctx.offset_point(hole.cx, hole.cy)),
    ];
    for pass in 1..=ctx.z_passes {
        lines.push(format!("G1 Z{:.3} F{}", ctx.pass_depth(pass), ctx.plunge_speed));
        lines.push(format!("G0 Z{}", ctx.work_height()));
    }
    lines.push(format!("G0 Z{}", ctx.clearance_height));
    lines
}

/// Group holes by diameter, keeping the order in which sizes first appear.
pub fn group_drills(holes: &[DrillHole]) -> Vec<Vec<DrillHole>> {
    let mut groups: IndexMap<String, Vec<DrillHole>> = IndexMap::new();
    for hole in holes {
        groups.entry(format!("{}", hole.r)).or_default().push(*hole);
    }
    groups.into_values().collect()
}

/// Every hole of one diameter, behind a single tool change.
pub fn generate_drill_group(locations: &[DrillHole], ctx: &MachiningContext) -> Vec<String> {
    let Some(first) = locations.first() else {
        return Vec::new();
    };
    let size = format!("{}{}", first.diameter(), ctx.units);

    let body = locations
        .iter()
        .flat_map(|hole| drill_z_passes(hole, ctx))
        .collect();

    let mut lines = vec![String::new(), format!("(Drill: {})", size)];
    lines.extend(with_tool_change(&format!("Insert {} drill", size), body, ctx));
    lines
}

pub fn generate_drills(holes: &[DrillHole], ctx: &MachiningContext) -> Vec<String> {
    let groups = group_drills(holes);
    let mut lines = vec![String::new(), format!("(Drills: {} size)", groups.len())];
    for group in &groups {
        lines.extend(generate_drill_group(group, ctx));
    }
    lines.push(format!("G0 Z{}", ctx.safe_height));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machining::machining_default_params;
    use tracemill_core::{Flip, TaskKind};

    fn context() -> MachiningContext {
        let params = machining_default_params(TaskKind::Drill).unwrap();
        MachiningContext::new(&params, Flip::None, 1000.0).unwrap()
    }

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let holes = [
            DrillHole::new(0.0, 0.0, 0.4),
            DrillHole::new(1.0, 0.0, 0.5),
            DrillHole::new(2.0, 0.0, 0.4),
        ];
        let groups = group_drills(&holes);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][1].cx, 2.0);
        assert_eq!(groups[1][0].r, 0.5);
    }

    #[test]
    fn test_peck_cycle() {
        let ctx = context();
        let lines = drill_z_passes(&DrillHole::new(1.0, 2.0, 0.4), &ctx);
        assert_eq!(lines[1], "(drill 0.8mm at X1.000 Y2.000 - 4 passes)");
        assert_eq!(lines[2], "G0 X1.000 Y2.000");
        assert_eq!(lines[3], "G1 Z-0.500 F80.000");
        assert_eq!(lines[4], "G0 Z0.000");
        assert!(lines.contains(&"G1 Z-1.800 F80.000".to_string()));
        assert_eq!(lines.last().unwrap(), "G0 Z0.500");
    }

    #[test]
    fn test_generate_drills() {
        let ctx = context();
        let holes = [DrillHole::new(0.0, 0.0, 0.4), DrillHole::new(1.0, 1.0, 0.6)];
        let gcode = generate_drills(&holes, &ctx).join("\n");
        assert!(gcode.contains("(Drills: 2 size)"));
        assert!(gcode.contains("(Drill: 0.8mm)"));
        assert!(gcode.contains("M0 tool change required - Insert 1.2mm drill"));
        assert!(gcode.ends_with("G0 Z1.500"));
    }
}
