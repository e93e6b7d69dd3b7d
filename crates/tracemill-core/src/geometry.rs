//! Geometry model
//!
//! Drawing-unit floating point primitives ([`PointF`], [`Polyline`]) as produced by
//! plotters, and the scaled integer model ([`Point`], [`Polygon`], [`PolygonSet`])
//! used for boolean operations, offsetting and G-code emission.
//!
//! Orientation convention: a polygon with a positive signed area (counter-clockwise
//! with Y pointing up) is an outer boundary; a negative signed area marks a hole.

use serde::{Deserialize, Serialize};

/// Tolerance, in drawing units, under which two points are considered the same.
///
/// Used to decide polyline connectivity, not polygon equality.
pub const SAME_POINT_EPSILON: f64 = 1e-4;

/// A point in drawing units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for PointF {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// An open or closed sequence of drawing-unit points
pub type Polyline = Vec<PointF>;

/// True when both coordinate deltas are below `epsilon`.
pub fn same_point(a: PointF, b: PointF, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

/// A point in scaled integer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Scale a drawing-unit point and round it onto the integer grid.
    pub fn from_scaled(point: PointF, scale: f64) -> Self {
        Self {
            x: (point.x * scale).round() as i64,
            y: (point.y * scale).round() as i64,
        }
    }
}

/// Location of a point relative to a polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Outside,
    Inside,
    OnBoundary,
}

/// An implicitly closed ring of integer points
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<Point>,
}

/// One task's filled geometry, or one offset ring
pub type PolygonSet = Vec<Polygon>;

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Twice the signed area (shoelace), exact in 128 bit.
    pub fn signed_area2(&self) -> i128 {
        let n = self.points.len();
        if n < 3 {
            return 0;
        }
        let mut sum: i128 = 0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
        }
        sum
    }

    /// Signed area in squared integer units.
    pub fn area(&self) -> f64 {
        self.signed_area2() as f64 / 2.0
    }

    /// Outer boundaries have a non-negative signed area.
    pub fn is_outer(&self) -> bool {
        self.signed_area2() >= 0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// True if the last point repeats the first.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Return the polygon with an explicit closing point.
    pub fn closed(mut self) -> Self {
        if let Some(&first) = self.points.first() {
            if !self.is_closed() {
                self.points.push(first);
            }
        }
        self
    }

    /// Drop consecutive duplicates and an explicit closing point.
    pub fn without_repeats(&self) -> Self {
        let mut points: Vec<Point> = Vec::with_capacity(self.points.len());
        for &p in &self.points {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// Point-in-polygon test, exact on the integer grid.
    pub fn containment(&self, pt: Point) -> Containment {
        let path = &self.points;
        let count = path.len();
        if count < 3 {
            return Containment::Outside;
        }

        let cross = |a: Point, b: Point| -> i128 {
            (a.x - pt.x) as i128 * (b.y - pt.y) as i128
                - (b.x - pt.x) as i128 * (a.y - pt.y) as i128
        };

        let mut inside = false;
        let mut ip = path[0];
        for i in 1..=count {
            let next = if i == count { path[0] } else { path[i] };

            if next.y == pt.y
                && (next.x == pt.x || (ip.y == pt.y && ((next.x > pt.x) == (ip.x < pt.x))))
            {
                return Containment::OnBoundary;
            }

            if (ip.y < pt.y) != (next.y < pt.y) {
                if ip.x >= pt.x {
                    if next.x > pt.x {
                        inside = !inside;
                    } else {
                        let d = cross(ip, next);
                        if d == 0 {
                            return Containment::OnBoundary;
                        }
                        if (d > 0) == (next.y > ip.y) {
                            inside = !inside;
                        }
                    }
                } else if next.x > pt.x {
                    let d = cross(ip, next);
                    if d == 0 {
                        return Containment::OnBoundary;
                    }
                    if (d > 0) == (next.y > ip.y) {
                        inside = !inside;
                    }
                }
            }
            ip = next;
        }

        if inside {
            Containment::Inside
        } else {
            Containment::Outside
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(std::slice::from_ref(self))
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Axis aligned bounds in integer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    /// Bounds of every point in `polygons`, `None` if there are no points.
    pub fn of(polygons: &[Polygon]) -> Option<Bounds> {
        let mut points = polygons.iter().flat_map(|p| p.points.iter());
        let first = points.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> i64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i64 {
        self.max_y - self.min_y
    }
}

/// A drill location in drawing units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillHole {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl DrillHole {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }

    pub fn diameter(&self) -> f64 {
        self.r * 2.0
    }
}
