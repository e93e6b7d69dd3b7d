use proptest::prelude::*;
use tracemill_camtools::kernel::{create_arc, shapes, ARC_TOLERANCE};
use tracemill_camtools::Transformer;
use tracemill_core::{same_point, PlotNode, PlotTree, Shape, TaskKind, Units, SAME_POINT_EPSILON};

fn plot(shape: Shape) -> PlotTree {
    let mut tree = PlotTree::new(Units::Millimeters);
    tree.push(PlotNode::Shape { shape });
    tree
}

proptest! {
    #[test]
    fn circles_are_filled_outer_regions(
        cx in -50.0f64..50.0,
        cy in -50.0f64..50.0,
        r in 0.05f64..20.0,
    ) {
        let mut transformer = Transformer::new(1.0, 0.05);
        transformer.run(&plot(Shape::Circle { cx, cy, r }), TaskKind::Isolation).unwrap();
        let polygons = transformer.result(TaskKind::Isolation).unwrap();

        prop_assert_eq!(polygons.len(), 1);
        prop_assert!(polygons[0].is_outer());

        let scale = transformer.geometry_scale();
        for p in polygons[0].iter() {
            let dx = p.x as f64 / scale - cx;
            let dy = p.y as f64 / scale - cy;
            prop_assert!(((dx * dx + dy * dy).sqrt() - r).abs() < ARC_TOLERANCE);
        }
    }

    #[test]
    fn rounded_rectangles_are_filled_outer_regions(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        w in 0.5f64..30.0,
        h in 0.5f64..30.0,
        radius in 0.0f64..2.0,
    ) {
        let mut transformer = Transformer::new(1.0, 0.05);
        let shape = Shape::Rectangle { x, y, x_size: w, y_size: h, r: Some(radius) };
        transformer.run(&plot(shape), TaskKind::Isolation).unwrap();
        let polygons = transformer.result(TaskKind::Isolation).unwrap();

        prop_assert_eq!(polygons.len(), 1);
        prop_assert!(polygons[0].is_outer());

        let bounds = polygons[0].bounds().unwrap();
        let scale = transformer.geometry_scale();
        prop_assert!((bounds.width() as f64 / scale - w).abs() < ARC_TOLERANCE);
        prop_assert!((bounds.height() as f64 / scale - h).abs() < ARC_TOLERANCE);
    }

    #[test]
    fn arc_points_lie_on_the_circle(
        r in 0.01f64..100.0,
        start in -6.0f64..6.0,
        sweep in -6.0f64..6.0,
    ) {
        for p in create_arc(1.0, -1.0, r, start, start + sweep) {
            let d = ((p.x - 1.0).powi(2) + (p.y + 1.0).powi(2)).sqrt();
            prop_assert!((d - r).abs() < 1e-9);
        }
    }
}

#[test]
fn test_capsule_is_outer_after_union() {
    let mut transformer = Transformer::new(1.0, 0.05);
    let mut tree = PlotTree::new(Units::Millimeters);
    tree.push(PlotNode::Path {
        width: 0.2,
        segments: vec![tracemill_core::PathSegment::Line {
            start: [0.0, 0.0],
            end: [5.0, 0.0],
        }],
    });
    transformer.run(&tree, TaskKind::Isolation).unwrap();
    let polygons = transformer.result(TaskKind::Isolation).unwrap();
    assert_eq!(polygons.len(), 1);
    assert!(polygons[0].is_outer());

    let bounds = polygons[0].bounds().unwrap();
    // end caps are tessellated, so the extremes sit slightly inside
    assert!((bounds.min_x + 100).abs() <= 5);
    assert!((bounds.max_x - 5100).abs() <= 5);
}

#[test]
fn test_shape_helpers_close_their_outlines() {
    let rect = shapes::rectangle(0.0, 0.0, 2.0, 1.0, None, 0.05);
    assert_eq!(rect.first(), rect.last());
    let circle = shapes::circle(0.0, 0.0, 1.0);
    let (first, last) = (circle[0], circle[circle.len() - 1]);
    assert!(same_point(first, last, SAME_POINT_EPSILON));
}
