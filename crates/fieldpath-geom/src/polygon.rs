//! Field boundary polygons.

use serde::{Deserialize, Serialize};

use crate::error::{GeomError, Result};
use crate::{Point2, Vec2, EPS};

/// A closed field boundary (2D).
///
/// Vertices are stored in order without a repeated closing point; the edge
/// from the last vertex back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices of the boundary in order.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Create a polygon from vertices.
    ///
    /// A duplicated closing vertex is dropped. Fails with fewer than three
    /// distinct vertices.
    pub fn new(mut points: Vec<Point2>) -> Result<Self> {
        if points.len() > 1 {
            let first = points[0];
            let last = points[points.len() - 1];
            if (last - first).norm() < EPS {
                points.pop();
            }
        }
        if points.len() < 3 {
            return Err(GeomError::InsufficientPoints {
                expected: 3,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the polygon holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area / 2.0
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Is the winding counter-clockwise?
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Ensure counter-clockwise winding.
    pub fn ensure_ccw(&mut self) {
        if !self.is_ccw() {
            self.reverse();
        }
    }

    /// Boundary length.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut length = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            length += (self.points[j] - self.points[i]).norm();
        }
        length
    }

    /// Vertex centroid.
    pub fn centroid(&self) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let sum = self
            .points
            .iter()
            .fold(Vec2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / self.points.len() as f64)
    }

    /// Axis-aligned bounding box as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::MAX, f64::MAX);
        let mut max = Point2::new(f64::MIN, f64::MIN);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Iterate over boundary edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Ray-cast point containment test.
    pub fn contains(&self, point: &Point2) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = &self.points[i];
            let pj = &self.points[j];
            if ((pi.y > point.y) != (pj.y > point.y))
                && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Shortest distance from a point to the boundary.
    pub fn boundary_distance(&self, point: &Point2) -> f64 {
        let mut best = f64::MAX;
        for (a, b) in self.edges() {
            best = best.min(segment_distance(point, &a, &b));
        }
        best
    }

    /// Rotate by `angle` radians about `origin`, returning a new polygon.
    pub fn rotated(&self, angle: f64, origin: &Point2) -> Polygon {
        let (sin, cos) = angle.sin_cos();
        let points = self
            .points
            .iter()
            .map(|p| rotate_about(p, origin, sin, cos))
            .collect();
        Polygon { points }
    }

    /// Verify the boundary does not cross itself.
    ///
    /// Adjacent edges sharing a vertex are ignored; any other pair of edges
    /// that properly intersect makes the polygon invalid for planning.
    pub fn validate_simple(&self) -> Result<()> {
        let n = self.points.len();
        for i in 0..n {
            let (a1, a2) = (self.points[i], self.points[(i + 1) % n]);
            for j in (i + 1)..n {
                // Skip edges that share a vertex with edge i.
                if j == i || (j + 1) % n == i || (i + 1) % n == j {
                    continue;
                }
                let (b1, b2) = (self.points[j], self.points[(j + 1) % n]);
                if segments_cross(&a1, &a2, &b1, &b2) {
                    return Err(GeomError::SelfIntersecting { vertex: i });
                }
            }
        }
        Ok(())
    }

    /// The boundary as a closed polyline (first point repeated at the end).
    pub fn exterior(&self) -> crate::Polyline {
        let mut points = self.points.clone();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        crate::Polyline::new(points)
    }
}

/// Rotate `p` about `origin` given a precomputed sine/cosine pair.
pub fn rotate_about(p: &Point2, origin: &Point2, sin: f64, cos: f64) -> Point2 {
    let d = p - origin;
    Point2::new(
        origin.x + d.x * cos - d.y * sin,
        origin.y + d.x * sin + d.y * cos,
    )
}

/// Distance from `p` to the segment `a`-`b`.
pub(crate) fn segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < EPS * EPS {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Do two segments properly cross (excluding shared endpoints)?
fn segments_cross(a1: &Point2, a2: &Point2, b1: &Point2, b2: &Point2) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn orient(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
