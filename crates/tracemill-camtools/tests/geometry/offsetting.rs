use tracemill_camtools::{create_offset_rings, filter_inside_board, is_point_inside_board, OffsetRequest};
use tracemill_core::{Bounds, Point, Polygon, TaskKind};

const SCALE: f64 = 1000.0;

fn rect(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Polygon {
    Polygon::new(vec![
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ])
}

fn request<'a>(polygons: &'a [Polygon], steps: u32, kind: TaskKind) -> OffsetRequest<'a> {
    OffsetRequest {
        steps,
        distance: 0.05,
        polygons,
        kind,
        board: None,
        scale: SCALE,
    }
}

#[test]
fn test_ring_count_matches_steps() {
    let polygons = [rect(0, 0, 2000, 2000)];
    for steps in 0..4 {
        let rings = create_offset_rings(&request(&polygons, steps, TaskKind::Isolation)).unwrap();
        assert_eq!(rings.len(), steps as usize);
    }
}

#[test]
fn test_zero_distance_gives_one_ring() {
    let polygons = [rect(0, 0, 2000, 2000)];
    let mut req = request(&polygons, 3, TaskKind::Isolation);
    req.distance = 0.0;
    let rings = create_offset_rings(&req).unwrap();
    assert_eq!(rings.len(), 1);
    assert_eq!(rings[0][0].without_repeats(), polygons[0]);
}

#[test]
fn test_rings_grow_by_the_offset() {
    let polygons = [rect(0, 0, 2000, 2000)];
    let rings = create_offset_rings(&request(&polygons, 2, TaskKind::Isolation)).unwrap();

    for (i, ring) in rings.iter().enumerate() {
        let grow = 50 * (i as i64 + 1);
        let bounds = Bounds::of(ring).unwrap();
        assert!((bounds.min_x + grow).abs() <= 2, "ring {} min_x {}", i, bounds.min_x);
        assert!((bounds.max_y - 2000 - grow).abs() <= 2, "ring {} max_y {}", i, bounds.max_y);
        assert!(ring.iter().all(Polygon::is_closed));
    }
}

#[test]
fn test_board_membership() {
    let mut hole = rect(400, 400, 600, 600);
    hole.reverse();
    let board = [rect(0, 0, 1000, 1000), hole];

    assert!(is_point_inside_board(Point::new(100, 100), &board));
    assert!(!is_point_inside_board(Point::new(1500, 100), &board));
    assert!(!is_point_inside_board(Point::new(500, 500), &board));
}

#[test]
fn test_rings_are_clipped_to_the_board() {
    let board = [rect(0, 0, 1000, 1000)];
    // a pad straddling the right board edge
    let polygons = [rect(900, 400, 1100, 600)];

    let mut req = request(&polygons, 1, TaskKind::Isolation);
    req.board = Some(&board);
    let rings = create_offset_rings(&req).unwrap();
    assert_eq!(rings.len(), 1);
    for polygon in &rings[0] {
        assert!(polygon.iter().all(|&p| is_point_inside_board(p, &board)));
    }

    // outlines are never clipped
    let mut req = request(&polygons, 1, TaskKind::EdgeCut);
    req.board = Some(&board);
    let rings = create_offset_rings(&req).unwrap();
    assert!(rings[0].iter().flat_map(|p| p.iter()).any(|p| p.x > 1000));
}

#[test]
fn test_filter_drops_outside_points() {
    let board = [rect(0, 0, 100, 100)];
    let path = rect(50, 50, 150, 80).closed();
    let filtered = filter_inside_board(&[path], &board);
    assert!(!filtered.is_empty());
    assert!(filtered
        .iter()
        .flat_map(|p| p.iter())
        .all(|p| p.x <= 100));
}

#[test]
fn test_negative_rings_shrink_a_square() {
    let polygons = [rect(0, 0, 2000, 2000)];
    let mut req = request(&polygons, 2, TaskKind::Isolation);
    req.distance = -0.1;
    let rings = create_offset_rings(&req).unwrap();
    assert_eq!(rings.len(), 2);

    for (i, ring) in rings.iter().enumerate() {
        let shrink = 100 * (i as i64 + 1);
        assert_eq!(ring.len(), 1);
        let bounds = Bounds::of(ring).unwrap();
        assert!((bounds.min_x - shrink).abs() <= 2, "ring {} min_x {}", i, bounds.min_x);
        assert!((bounds.max_x - 2000 + shrink).abs() <= 2, "ring {} max_x {}", i, bounds.max_x);
        assert!(ring[0].is_outer());
    }
}

#[test]
fn test_growing_an_annulus_shrinks_the_hole() {
    let mut hole = rect(800, 800, 1200, 1200);
    hole.reverse();
    let polygons = [rect(0, 0, 2000, 2000), hole];
    let rings = create_offset_rings(&request(&polygons, 1, TaskKind::Isolation)).unwrap();
    assert_eq!(rings[0].len(), 2);

    let outer = rings[0].iter().find(|p| p.is_outer()).unwrap();
    let bounds = outer.bounds().unwrap();
    assert!((bounds.min_x + 50).abs() <= 2);
    assert!((bounds.max_x - 2050).abs() <= 2);

    let hole = rings[0].iter().find(|p| !p.is_outer()).unwrap();
    let bounds = hole.bounds().unwrap();
    assert!((bounds.min_x - 850).abs() <= 2);
    assert!((bounds.max_x - 1150).abs() <= 2);
}

#[test]
fn test_annulus_collapses_once_the_hole_overtakes_it() {
    let mut hole = rect(800, 800, 1200, 1200);
    hole.reverse();
    let polygons = [rect(0, 0, 2000, 2000), hole];
    let mut req = request(&polygons, 2, TaskKind::Isolation);
    req.distance = -0.3;
    let rings = create_offset_rings(&req).unwrap();

    // first ring: outer 300..1700 around a hole grown to 500..1500
    assert_eq!(rings[0].len(), 2);
    // second ring: the hole (200..1800) covers what is left of the outer loop
    assert!(rings[1].is_empty(), "left {} polygons", rings[1].len());
}
