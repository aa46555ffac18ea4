//! Zig-zag coverage path generation.

use fieldpath_geom::{Point2, Polygon};
use serde::{Deserialize, Serialize};

/// Settings for coverage path generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Effective spray swath width (m).
    pub swath_width: f64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self { swath_width: 5.0 }
    }
}

/// A coverage path for one sub-field at one heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveragePath {
    /// Waypoints in flight order.
    pub waypoints: Vec<Point2>,
    /// Total flight distance including connectors (m).
    pub flight_distance: f64,
    /// Approximate covered area: spray-line length × swath width (m²).
    ///
    /// Deliberately not a polygon intersection; the coverage-error fitness
    /// term only needs a consistent estimate.
    pub covered_area: f64,
}

impl CoveragePath {
    /// A path with no waypoints and zero metrics.
    pub fn empty() -> Self {
        Self {
            waypoints: Vec::new(),
            flight_distance: 0.0,
            covered_area: 0.0,
        }
    }

    /// True when the sweep produced no usable line.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Generate a boustrophedon path over `polygon` at `heading_deg`.
///
/// The polygon is rotated so sweep lines become horizontal, probed bottom-up
/// every swath width starting half a swath above the lowest point, and the
/// resulting segments are chained with straight connectors, alternating
/// direction per probe line. A field thinner than half a swath yields an
/// empty path with zero metrics — valid output, the caller decides whether
/// that is a problem.
pub fn sweep_polygon(polygon: &Polygon, heading_deg: f64, settings: &SweepSettings) -> CoveragePath {
    let d = settings.swath_width;
    if d <= 0.0 || polygon.len() < 3 {
        return CoveragePath::empty();
    }

    let heading = heading_deg.to_radians();
    let centroid = polygon.centroid();
    let rotated = polygon.rotated(-heading, &centroid);
    let (min, max) = rotated.bounds();

    let mut lines: Vec<Vec<Point2>> = Vec::new();
    let mut spray_length = 0.0;
    let mut y = min.y + d / 2.0;
    let mut left_to_right = true;

    while y < max.y {
        let mut xs = scanline_crossings(&rotated, y);
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // Pair up entry/exit crossings; segments stay sorted left-to-right
        // even on right-to-left lines, only the points within each segment
        // reverse.
        for pair in xs.chunks(2) {
            if pair.len() == 2 {
                let mut seg = vec![Point2::new(pair[0], y), Point2::new(pair[1], y)];
                spray_length += pair[1] - pair[0];
                if !left_to_right {
                    seg.reverse();
                }
                lines.push(seg);
            }
        }

        y += d;
        left_to_right = !left_to_right;
    }

    if lines.is_empty() {
        return CoveragePath::empty();
    }

    // Chain the segments; consecutive waypoints double as straight
    // connectors, no turn smoothing.
    let path_rotated: Vec<Point2> = lines.into_iter().flatten().collect();

    let (sin, cos) = heading.sin_cos();
    let waypoints: Vec<Point2> = path_rotated
        .iter()
        .map(|p| fieldpath_geom::polygon::rotate_about(p, &centroid, sin, cos))
        .collect();

    let flight_distance = waypoints
        .windows(2)
        .map(|w| (w[1] - w[0]).norm())
        .sum();

    CoveragePath {
        waypoints,
        flight_distance,
        covered_area: spray_length * d,
    }
}

/// X coordinates where the horizontal line at `y` crosses the boundary.
fn scanline_crossings(polygon: &Polygon, y: f64) -> Vec<f64> {
    let mut xs = Vec::new();
    for (a, b) in polygon.edges() {
        if (a.y > y) != (b.y > y) {
            xs.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
    xs
}
