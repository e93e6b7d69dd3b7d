use proptest::prelude::*;
use std::f64::consts::TAU;
use tracemill_camtools::kernel::stitch_polylines;
use tracemill_core::{PointF, Polyline, SAME_POINT_EPSILON};

fn vertices(n: usize) -> Vec<PointF> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            PointF::new((10.0 * angle.cos()).round(), (10.0 * angle.sin()).round())
        })
        .collect()
}

/// Canonical form of a loop: its distinct points, sorted.
fn point_set(path: &Polyline) -> Vec<(i64, i64)> {
    let mut points: Vec<(i64, i64)> = path
        .iter()
        .map(|p| (p.x.round() as i64, p.y.round() as i64))
        .collect();
    points.sort();
    points.dedup();
    points
}

fn segments_strategy() -> impl Strategy<Value = (usize, Vec<usize>, Vec<bool>)> {
    (4usize..10).prop_flat_map(|n| {
        (
            Just(n),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            proptest::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #[test]
    fn stitching_ignores_input_order((n, order, reversed) in segments_strategy()) {
        let points = vertices(n);
        let segments: Vec<Polyline> = order
            .iter()
            .zip(reversed.iter())
            .map(|(&i, &rev)| {
                let a = points[i];
                let b = points[(i + 1) % n];
                if rev { vec![b, a] } else { vec![a, b] }
            })
            .collect();

        let in_order: Vec<Polyline> = (0..n).map(|i| vec![points[i], points[(i + 1) % n]]).collect();

        let shuffled = stitch_polylines(segments, SAME_POINT_EPSILON);
        let reference = stitch_polylines(in_order, SAME_POINT_EPSILON);

        prop_assert_eq!(shuffled.len(), 1);
        prop_assert_eq!(reference.len(), 1);
        prop_assert_eq!(shuffled[0].len(), n + 1);
        prop_assert_eq!(shuffled[0].first(), shuffled[0].last());
        prop_assert_eq!(point_set(&shuffled[0]), point_set(&reference[0]));
    }
}

#[test]
fn test_two_separate_loops() {
    let square = |x: f64| -> Vec<Polyline> {
        let p = [
            PointF::new(x, 0.0),
            PointF::new(x + 1.0, 0.0),
            PointF::new(x + 1.0, 1.0),
            PointF::new(x, 1.0),
        ];
        (0..4).map(|i| vec![p[i], p[(i + 1) % 4]]).collect()
    };

    let mut segments = square(0.0);
    segments.extend(square(5.0));
    segments.swap(1, 6);

    let loops = stitch_polylines(segments, SAME_POINT_EPSILON);
    assert_eq!(loops.len(), 2);
    assert!(loops.iter().all(|l| l.len() == 5 && l.first() == l.last()));
}
