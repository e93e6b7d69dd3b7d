use tracemill_camtools::{
    create_offset_rings, generate_program, MachiningParams, OffsetRequest, RenderedTask,
    Transformer,
};
use tracemill_core::{Bounds, PlotNode, PlotTree, Shape, Task, TaskKind, Units};

#[test]
fn test_square_isolation_end_to_end() {
    let mut tree = PlotTree::new(Units::Millimeters);
    tree.push(PlotNode::Shape {
        shape: Shape::Polygon {
            points: vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
        },
    });
    let task = Task::new("square.gbr", "", TaskKind::Isolation)
        .with_steps(2)
        .with_offset(0.05);

    let mut transformer = Transformer::new(1.0, 0.05);
    transformer.run(&tree, task.kind).unwrap();
    let polygons = transformer.result(task.kind).unwrap();
    assert_eq!(polygons.len(), 1);
    let scale = transformer.geometry_scale();

    let request = OffsetRequest {
        steps: task.steps,
        distance: task.offset,
        polygons: &polygons,
        kind: task.kind,
        board: None,
        scale,
    };
    let rings = create_offset_rings(&request).unwrap();
    assert_eq!(rings.len(), 2);

    for (i, ring) in rings.iter().enumerate() {
        assert_eq!(ring.len(), 1);
        assert!(ring[0].is_closed());
        let grow = 0.05 * (i + 1) as f64;
        let bounds = Bounds::of(ring).unwrap();
        assert!((bounds.min_x as f64 / scale + grow).abs() < 0.005);
        assert!((bounds.max_x as f64 / scale - 2.0 - grow).abs() < 0.005);
    }

    let rendered = RenderedTask {
        task,
        polygons,
        drills: Vec::new(),
        offset_paths: rings,
        svg_path_props: Vec::new(),
    };
    let params = MachiningParams {
        cut_depth: -0.2,
        step_depth: 0.1,
        ..MachiningParams::default()
    };
    let gcode = generate_program(&rendered, &params, scale, false).unwrap();

    assert_eq!(gcode.matches("(Contour 1)").count(), 1);
    assert_eq!(gcode.matches("(Contour 2)").count(), 1);
    assert!(!gcode.contains("(Contour 3)"));
    assert_eq!(gcode.matches("(Z Pass 1: Depth -0.100)").count(), 2);
    assert_eq!(gcode.matches("(Z Pass 2: Depth -0.200)").count(), 2);
    assert!(!gcode.contains("(Z Pass 3"));
    assert!(gcode.contains("G1 X-0.050 Y"));
}
