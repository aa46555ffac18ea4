//! Open and closed point chains with arc-length parameterization.

use serde::{Deserialize, Serialize};

use crate::polygon::segment_distance;
use crate::{Point2, EPS};

/// An ordered chain of points.
///
/// A closed ring is represented by repeating the first point at the end;
/// arc-length operations make no distinction — wraparound semantics live
/// with the callers that need them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    /// Points along the path.
    pub points: Vec<Point2>,
}

impl Polyline {
    /// Create a polyline.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// True when the polyline holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum()
    }

    /// Arc-length parameter of the point on the polyline nearest to `p`.
    pub fn project(&self, p: &Point2) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut best_dist = f64::MAX;
        let mut best_s = 0.0;
        let mut s = 0.0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let ab = b - a;
            let seg_len = ab.norm();
            if seg_len > EPS {
                let t = ((p - a).dot(&ab) / (seg_len * seg_len)).clamp(0.0, 1.0);
                let closest = a + ab * t;
                let dist = (p - closest).norm();
                if dist < best_dist {
                    best_dist = dist;
                    best_s = s + t * seg_len;
                }
            }
            s += seg_len;
        }
        best_s
    }

    /// Point at arc-length parameter `s` (clamped to the polyline extent).
    pub fn point_at(&self, s: f64) -> Point2 {
        if self.points.is_empty() {
            return Point2::origin();
        }
        if self.points.len() == 1 || s <= 0.0 {
            return self.points[0];
        }
        let mut remaining = s;
        for w in self.points.windows(2) {
            let seg_len = (w[1] - w[0]).norm();
            if remaining <= seg_len {
                if seg_len < EPS {
                    return w[0];
                }
                return w[0] + (w[1] - w[0]) * (remaining / seg_len);
            }
            remaining -= seg_len;
        }
        self.points[self.points.len() - 1]
    }

    /// Slice the polyline between arc-length parameters `s0 <= s1`.
    ///
    /// The slice runs in the polyline's own direction and includes
    /// interpolated endpoints; parameters are clamped to the extent.
    pub fn extract(&self, s0: f64, s1: f64) -> Polyline {
        let total = self.length();
        let s0 = s0.clamp(0.0, total);
        let s1 = s1.clamp(0.0, total);
        if self.points.len() < 2 || s1 - s0 < EPS {
            return Polyline::new(vec![self.point_at(s0)]);
        }

        let mut out = vec![self.point_at(s0)];
        let mut s = 0.0;
        for w in self.points.windows(2) {
            let seg_len = (w[1] - w[0]).norm();
            let end = s + seg_len;
            // Interior vertices strictly inside the slice.
            if end > s0 + EPS && end < s1 - EPS {
                out.push(w[1]);
            }
            s = end;
            if s >= s1 {
                break;
            }
        }
        out.push(self.point_at(s1));
        Polyline::new(out)
    }

    /// Shortest distance from `p` to the polyline.
    pub fn distance_to(&self, p: &Point2) -> f64 {
        if self.points.is_empty() {
            return f64::MAX;
        }
        if self.points.len() == 1 {
            return (p - self.points[0]).norm();
        }
        let mut best = f64::MAX;
        for w in self.points.windows(2) {
            best = best.min(segment_distance(p, &w[0], &w[1]));
        }
        best
    }

    /// A copy with the point order reversed.
    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> Polyline {
        // 10x10 square ring, perimeter 40.
        Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0),
        ])
    }

    #[test]
    fn test_length() {
        assert!((ring().length() - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_project() {
        let r = ring();
        // Nearest point to (5, -3) is (5, 0), arc length 5 along the first edge.
        assert!((r.project(&Point2::new(5.0, -3.0)) - 5.0).abs() < 1e-10);
        // Nearest point to (12, 5) is (10, 5), arc length 15.
        assert!((r.project(&Point2::new(12.0, 5.0)) - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_point_at() {
        let r = ring();
        let p = r.point_at(15.0);
        assert!((p - Point2::new(10.0, 5.0)).norm() < 1e-10);
        // Clamped beyond the end.
        let q = r.point_at(1000.0);
        assert!((q - Point2::new(0.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_extract() {
        let r = ring();
        let sub = r.extract(5.0, 15.0);
        assert!((sub.length() - 10.0).abs() < 1e-10);
        assert!((sub.points[0] - Point2::new(5.0, 0.0)).norm() < 1e-10);
        assert!((sub.points[sub.len() - 1] - Point2::new(10.0, 5.0)).norm() < 1e-10);
        // The corner (10, 0) is an interior vertex of the slice.
        assert!(sub.points.iter().any(|p| (p - Point2::new(10.0, 0.0)).norm() < 1e-10));
    }

    #[test]
    fn test_distance_to() {
        let r = ring();
        assert!((r.distance_to(&Point2::new(5.0, -3.0)) - 3.0).abs() < 1e-10);
        assert!((r.distance_to(&Point2::new(5.0, 5.0)) - 5.0).abs() < 1e-10);
    }
}
