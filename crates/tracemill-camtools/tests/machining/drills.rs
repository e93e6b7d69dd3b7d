use tracemill_camtools::machining::group_drills;
use tracemill_camtools::{generate_drills, machining_default_params, MachiningContext};
use tracemill_core::{DrillHole, Flip, TaskKind};

fn holes() -> Vec<DrillHole> {
    [0.4, 0.4, 0.6, 0.4, 0.6]
        .iter()
        .enumerate()
        .map(|(i, &r)| DrillHole::new(i as f64 * 2.0, 1.0, r))
        .collect()
}

#[test]
fn test_grouping_by_radius() {
    let groups = group_drills(&holes());
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![3, 2]);
    assert!(groups[0].iter().all(|h| h.r == 0.4));
}

#[test]
fn test_one_tool_change_per_group() {
    let params = machining_default_params(TaskKind::Drill).unwrap();
    let ctx = MachiningContext::new(&params, Flip::None, 60_000.0).unwrap();
    let gcode = generate_drills(&holes(), &ctx).join("\n");

    assert_eq!(gcode.matches("M0 tool change required").count(), 2);
    assert!(gcode.contains("M0 tool change required - Insert 0.8mm drill"));
    assert!(gcode.contains("M0 tool change required - Insert 1.2mm drill"));
    assert_eq!(gcode.matches("(drill ").count(), 5);
    assert!(gcode.contains("(drill 0.8mm at X2.000 Y1.000 - 4 passes)"));
}

#[test]
fn test_flipped_drill_coordinates() {
    let params = machining_default_params(TaskKind::Drill).unwrap();
    let ctx = MachiningContext::new(&params, Flip::Both, 60_000.0).unwrap();
    let gcode = generate_drills(&[DrillHole::new(3.0, 4.0, 0.5)], &ctx).join("\n");
    assert!(gcode.contains("G0 X-3.000 Y-4.000"));
}
