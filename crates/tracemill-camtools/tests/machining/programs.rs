use tracemill_camtools::machining::contour_z_passes;
use tracemill_camtools::{
    generate_program, machining_default_params, MachiningContext, MachiningParams, RenderedTask,
};
use tracemill_core::{DrillHole, Flip, Point, Polygon, Task, TaskKind, Units};

fn square() -> Polygon {
    Polygon::new(vec![
        Point::new(0, 0),
        Point::new(1000, 0),
        Point::new(1000, 1000),
        Point::new(0, 1000),
    ])
    .closed()
}

fn rendered(kind: TaskKind) -> RenderedTask {
    RenderedTask {
        task: Task::new("board-F_Cu.gbr", "", kind),
        polygons: vec![square()],
        drills: vec![DrillHole::new(1.0, 1.0, 0.4)],
        offset_paths: vec![vec![square()]],
        svg_path_props: Vec::new(),
    }
}

#[test]
fn test_z_pass_depths() {
    let params = MachiningParams {
        cut_depth: -0.3,
        step_depth: 0.1,
        ..MachiningParams::default()
    };
    let ctx = MachiningContext::new(&params, Flip::None, 1000.0).unwrap();
    assert_eq!(ctx.z_passes, 3);

    let plunges: Vec<String> = contour_z_passes(&square(), &ctx)
        .into_iter()
        .filter(|line| line.starts_with("G1 Z"))
        .collect();
    assert_eq!(
        plunges,
        vec!["G1 Z-0.100 F100.000", "G1 Z-0.200 F100.000", "G1 Z-0.300 F100.000"]
    );
}

#[test]
fn test_work_height_shifts_depths() {
    let params = MachiningParams {
        cut_depth: -0.2,
        step_depth: 0.1,
        work_height: 1.0,
        ..MachiningParams::default()
    };
    let ctx = MachiningContext::new(&params, Flip::None, 1000.0).unwrap();
    let lines = contour_z_passes(&square(), &ctx);
    assert!(lines.contains(&"G1 Z0.900 F100.000".to_string()));
    assert!(lines.contains(&"G1 Z0.800 F100.000".to_string()));
    assert!(lines.contains(&"G0 Z1.000".to_string()));
}

#[test]
fn test_program_envelope() {
    let params = machining_default_params(TaskKind::Isolation).unwrap();
    let gcode = generate_program(&rendered(TaskKind::Isolation), &params, 1000.0, false).unwrap();

    assert!(gcode.starts_with("%\n(isolation board-F_Cu.gbr)\nG90\nG17\nG21\nG94\n"));
    assert!(gcode.ends_with("M30\n%\n"));
    assert!(gcode.contains("M3 S16000"));
    assert!(gcode.contains("(Contour 1)"));
    assert!(gcode.contains("G1 X1.000 Y1.000 F150.000"));
}

#[test]
fn test_inch_programs_select_g20() {
    let params = MachiningParams {
        units: Units::Inches,
        ..machining_default_params(TaskKind::Isolation).unwrap()
    };
    let gcode = generate_program(&rendered(TaskKind::Isolation), &params, 1000.0, false).unwrap();
    assert!(gcode.contains("\nG20\n"));
}

#[test]
fn test_drill_program_uses_holes() {
    let params = machining_default_params(TaskKind::Drill).unwrap();
    let gcode = generate_program(&rendered(TaskKind::Drill), &params, 1000.0, false).unwrap();
    assert!(gcode.contains("(Drills: 1 size)"));
    assert!(!gcode.contains("(Contour"));
}

#[test]
fn test_render_only_program() {
    let params = machining_default_params(TaskKind::Isolation).unwrap();
    let gcode = generate_program(&rendered(TaskKind::Isolation), &params, 1000.0, true).unwrap();

    assert!(!gcode.contains('%'));
    assert!(!gcode.contains("M3"));
    assert!(!gcode.contains("M0 "));
    assert!(!gcode.contains("G90"));
    assert!(gcode
        .lines()
        .all(|l| l.starts_with("G0 ") || l.starts_with("G1 ") || l.starts_with('(')));
}

#[test]
fn test_drawing_tasks_are_not_milled() {
    assert!(machining_default_params(TaskKind::Drawing).is_err());
    let params = MachiningParams::default();
    assert!(generate_program(&rendered(TaskKind::Drawing), &params, 1000.0, false).is_err());
}
