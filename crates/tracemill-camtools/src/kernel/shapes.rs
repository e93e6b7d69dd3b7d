//! Shape to polygon conversion
//!
//! Every function returns an explicitly closed polyline in drawing units with a
//! positive winding, ready to be scaled into the union accumulator.

use super::arc::create_arc;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracemill_core::{same_point, PointF, Polyline, SAME_POINT_EPSILON};

fn close(mut points: Polyline) -> Polyline {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if !same_point(first, last, SAME_POINT_EPSILON) {
            points.push(first);
        }
    }
    points
}

/// Rectangle with rounded corners.
///
/// The corner radius is floored at `minimum_radius` (the tool radius) and capped at
/// half of the shorter side.
pub fn rectangle(x: f64, y: f64, w: f64, h: f64, r: Option<f64>, minimum_radius: f64) -> Polyline {
    let r = r
        .unwrap_or(0.0)
        .max(minimum_radius)
        .min(w.abs() / 2.0)
        .min(h.abs() / 2.0)
        .max(0.0);

    let mut points = Vec::new();
    points.extend(create_arc(x + r, y + r, r, PI, PI + FRAC_PI_2));
    points.extend(create_arc(x + w - r, y + r, r, PI + FRAC_PI_2, TAU));
    points.extend(create_arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2));
    points.extend(create_arc(x + r, y + h - r, r, FRAC_PI_2, PI));
    close(points)
}

pub fn circle(cx: f64, cy: f64, r: f64) -> Polyline {
    close(create_arc(cx, cy, r, 0.0, TAU))
}

/// Free-form polygon; fewer than three points yield nothing.
pub fn polygon(points: &[[f64; 2]]) -> Option<Polyline> {
    if points.len() < 3 {
        return None;
    }
    Some(close(points.iter().map(|&p| PointF::from(p)).collect()))
}

/// Stadium shaped outline of a stroked straight segment.
pub fn line_capsule(start: [f64; 2], end: [f64; 2], width: f64) -> Polyline {
    let [x1, y1] = start;
    let [x2, y2] = end;
    let angle = (y2 - y1).atan2(x2 - x1);
    let radius = width / 2.0;

    let mut points = create_arc(x1, y1, radius, angle + FRAC_PI_2, angle - FRAC_PI_2 + TAU);
    points.extend(create_arc(x2, y2, radius, angle - FRAC_PI_2, angle + FRAC_PI_2));
    close(points)
}

/// Outline of a stroked arc: two concentric arcs joined by round end caps.
pub fn arc_capsule(
    center: [f64; 2],
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    width: f64,
) -> Polyline {
    let [cx, cy] = center;
    let half = width / 2.0;
    let sweep = end_angle - start_angle;

    if radius <= 0.0 || sweep == 0.0 {
        let start = [cx + radius * start_angle.cos(), cy + radius * start_angle.sin()];
        let end = [cx + radius * end_angle.cos(), cy + radius * end_angle.sin()];
        return line_capsule(start, end, width);
    }

    let dir = sweep.signum();
    let (sx, sy) = (cx + radius * start_angle.cos(), cy + radius * start_angle.sin());
    let (ex, ey) = (cx + radius * end_angle.cos(), cy + radius * end_angle.sin());

    let mut points = create_arc(cx, cy, radius + half, start_angle, end_angle);
    points.extend(create_arc(ex, ey, half, end_angle, end_angle + dir * PI));

    let inner = radius - half;
    if inner > 0.0 {
        points.extend(create_arc(cx, cy, inner, end_angle, start_angle));
    } else {
        points.push(PointF::new(cx, cy));
    }

    points.extend(create_arc(
        sx,
        sy,
        half,
        start_angle + dir * PI,
        start_angle + dir * TAU,
    ));
    close(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(points: &[PointF]) -> f64 {
        points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_rectangle_is_closed_and_outer() {
        let rect = rectangle(0.0, 0.0, 2.0, 1.0, None, 0.05);
        assert_eq!(rect.first(), rect.last());
        let area = signed_area(&rect);
        // rounded corners remove a little area from 2.0
        assert!(area > 1.99 && area < 2.0, "area {}", area);
    }

    #[test]
    fn test_rectangle_radius_is_capped() {
        let rect = rectangle(0.0, 0.0, 1.0, 1.0, Some(5.0), 0.05);
        // a fully rounded unit square is a circle of radius 0.5
        for p in &rect {
            let d = ((p.x - 0.5).powi(2) + (p.y - 0.5).powi(2)).sqrt();
            assert!((d - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_line_capsule_covers_segment() {
        let capsule = line_capsule([0.0, 0.0], [1.0, 0.0], 0.2);
        assert!(signed_area(&capsule) > 0.2);
        let max_x = capsule.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_x = capsule.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert!((max_x - 1.1).abs() < 1e-3);
        assert!((min_x + 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_arc_capsule_in_both_directions() {
        let ccw = arc_capsule([0.0, 0.0], 1.0, 0.0, FRAC_PI_2, 0.2);
        let cw = arc_capsule([0.0, 0.0], 1.0, FRAC_PI_2, 0.0, 0.2);
        // quarter annulus 0.9..1.1 plus two half caps
        let expected = PI / 4.0 * (1.1f64.powi(2) - 0.9f64.powi(2)) + PI * 0.01;
        assert!((signed_area(&ccw).abs() - expected).abs() < 0.01);
        assert!((signed_area(&cw).abs() - expected).abs() < 0.01);
    }

    #[test]
    fn test_polygon_requires_three_points() {
        assert!(polygon(&[[0.0, 0.0], [1.0, 0.0]]).is_none());
        let tri = polygon(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        assert_eq!(tri.len(), 4);
    }
}
