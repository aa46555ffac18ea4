//! Concavity-aware decomposition into heading-safe sub-fields.
//!
//! A concave vertex whose reflex interior angle contains the sweep heading
//! obstructs straight boustrophedon lines: a sweep line entering the notch
//! leaves the field and re-enters, forcing long deadheading connectors. The
//! decomposer scans vertices in boundary order, and at the first obstructive
//! vertex casts a ray along the heading and splits the field where that ray
//! runs through the interior. Splitting recurses until no obstructive vertex
//! remains for the heading.
//!
//! The first obstructive vertex wins; the result depends on vertex order and
//! is not globally optimal. That is deliberate and must be preserved.

use crate::{Point2, Polygon, Vec2, EPS};

const TAU: f64 = std::f64::consts::TAU;

/// Length of the cutting ray (meters); fields are assumed smaller than this.
const RAY_LENGTH: f64 = 10_000.0;

/// Angular tolerance keeping a heading collinear with an edge out of the
/// reflex-interval test.
const ANGLE_TOL: f64 = 1e-6;

/// Tuning for the decomposition pass.
#[derive(Debug, Clone, Copy)]
pub struct DecomposeSettings {
    /// Recursion depth guard; at the limit the residual polygon is returned
    /// unmodified.
    pub max_depth: u32,
    /// Splits producing a fragment smaller than this (m²) are rejected.
    pub min_fragment_area: f64,
    /// Splits leaving one part above this fraction of the original area are
    /// rejected as near-no-ops.
    pub max_area_ratio: f64,
    /// Cross-product threshold below which a vertex counts as concave.
    pub concavity_eps: f64,
}

impl Default for DecomposeSettings {
    fn default() -> Self {
        Self {
            max_depth: 50,
            min_fragment_area: 10.0,
            max_area_ratio: 0.999,
            concavity_eps: 1e-3,
        }
    }
}

/// Split `polygon` into sub-polygons that are safe to sweep at
/// `heading_deg`.
///
/// Returns the input unchanged (as a single-element list) when nothing
/// obstructs the heading or when the depth guard is reached.
pub fn decompose(polygon: &Polygon, heading_deg: f64, settings: &DecomposeSettings) -> Vec<Polygon> {
    decompose_rec(polygon, heading_deg.to_radians(), settings, 0)
}

/// Does any vertex of `polygon` obstruct a sweep at `heading_deg`?
pub fn has_obstructive_vertex(polygon: &Polygon, heading_deg: f64, settings: &DecomposeSettings) -> bool {
    let heading = heading_deg.to_radians();
    (0..polygon.len()).any(|i| {
        is_concave(polygon, i, settings.concavity_eps) && is_obstructive(polygon, i, heading)
    })
}

fn decompose_rec(
    polygon: &Polygon,
    heading: f64,
    settings: &DecomposeSettings,
    depth: u32,
) -> Vec<Polygon> {
    if depth > settings.max_depth {
        return vec![polygon.clone()];
    }

    let area = polygon.area();
    let n = polygon.len();

    for i in 0..n {
        if !is_concave(polygon, i, settings.concavity_eps) || !is_obstructive(polygon, i, heading) {
            continue;
        }

        let parts = split_along_ray(polygon, i, heading);
        if parts.len() < 2 {
            // Ray never ran through the interior; try the next vertex.
            continue;
        }

        let trivial = parts.iter().any(|p| {
            p.area() < settings.min_fragment_area || p.area() > settings.max_area_ratio * area
        });
        if trivial {
            continue;
        }

        let mut result = Vec::new();
        for part in &parts {
            result.extend(decompose_rec(part, heading, settings, depth + 1));
        }
        return result;
    }

    vec![polygon.clone()]
}

/// Concavity via the cross product of the edge vectors leaving vertex `i`.
///
/// On a CCW boundary a right turn (negative cross) marks a concave vertex;
/// the epsilon keeps near-collinear vertices out.
fn is_concave(polygon: &Polygon, i: usize, eps: f64) -> bool {
    let n = polygon.len();
    let curr = polygon.points[i];
    let prev = polygon.points[(i + n - 1) % n];
    let next = polygon.points[(i + 1) % n];

    let vec_prev = prev - curr;
    let vec_next = next - curr;
    let cross = vec_next.x * vec_prev.y - vec_next.y * vec_prev.x;
    cross < -eps
}

/// Does the heading fall strictly inside the reflex interior angle at the
/// concave vertex `i`?
///
/// The reflex interior cone runs counter-clockwise from the outgoing edge
/// direction to the incoming one; a heading inside it sends sweep lines
/// through the notch. Headings collinear with either edge stay unflagged.
fn is_obstructive(polygon: &Polygon, i: usize, heading: f64) -> bool {
    let n = polygon.len();
    let curr = polygon.points[i];
    let prev = polygon.points[(i + n - 1) % n];
    let next = polygon.points[(i + 1) % n];

    let vec_prev = prev - curr;
    let vec_next = next - curr;

    let start = vec_next.y.atan2(vec_next.x).rem_euclid(TAU);
    let mut end = vec_prev.y.atan2(vec_prev.x).rem_euclid(TAU);
    let flight = heading.rem_euclid(TAU);

    if end <= start {
        end += TAU;
    }

    let inside = |a: f64| start + ANGLE_TOL < a && a < end - ANGLE_TOL;
    inside(flight) || inside(flight + TAU)
}

/// One end of a splitting chord: a point lying on edge `edge`.
#[derive(Debug, Clone, Copy)]
struct ChordEnd {
    edge: usize,
    point: Point2,
}

/// Cast a ray from vertex `i` along `heading` and split the polygon along
/// the first stretch of the ray that runs through the interior.
///
/// Returns fewer than two parts when the ray misses the interior or the
/// split degenerates.
fn split_along_ray(polygon: &Polygon, i: usize, heading: f64) -> Vec<Polygon> {
    let n = polygon.len();
    let origin = polygon.points[i];
    let dir = Vec2::new(heading.cos(), heading.sin());

    // Collect proper crossings of the ray with non-adjacent edges.
    let mut crossings: Vec<ChordEnd> = Vec::new();
    let mut params: Vec<f64> = Vec::new();
    for j in 0..n {
        if j == i || (j + 1) % n == i {
            continue;
        }
        let a = polygon.points[j];
        let b = polygon.points[(j + 1) % n];
        let seg = b - a;

        let denom = dir.x * seg.y - dir.y * seg.x;
        if denom.abs() < 1e-12 {
            continue;
        }
        let diff = a - origin;
        let t = (diff.x * seg.y - diff.y * seg.x) / denom;
        let u = (diff.x * dir.y - diff.y * dir.x) / denom;
        if t > 1e-9 && t <= RAY_LENGTH && (-1e-9..=1.0 + 1e-9).contains(&u) {
            crossings.push(ChordEnd {
                edge: j,
                point: a + seg * u.clamp(0.0, 1.0),
            });
            params.push(t);
        }
    }
    if crossings.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..crossings.len()).collect();
    order.sort_by(|&a, &b| params[a].partial_cmp(&params[b]).unwrap());

    // The ray leaves the vertex at t = 0; walk the crossing intervals and
    // cut along the first one whose midpoint lies inside the field.
    let vertex_end = ChordEnd {
        edge: i,
        point: origin,
    };
    let mut prev_t = 0.0;
    let mut prev_end = vertex_end;
    for &k in &order {
        let t = params[k];
        if t - prev_t > 1e-6 {
            let mid = origin + dir * ((prev_t + t) / 2.0);
            if polygon.contains(&mid) {
                return split_at_chord(polygon, prev_end, crossings[k]);
            }
        }
        prev_t = t;
        prev_end = crossings[k];
    }

    Vec::new()
}

/// Split the polygon along the chord `a`–`b`, both ends on the boundary.
fn split_at_chord(polygon: &Polygon, a: ChordEnd, b: ChordEnd) -> Vec<Polygon> {
    let n = polygon.len();

    // Both ends on the same edge: the chord lies along the boundary and
    // cannot split anything.
    if a.edge == b.edge {
        return Vec::new();
    }

    let walk = |from: ChordEnd, to: ChordEnd| -> Option<Polygon> {
        let mut pts = vec![from.point];
        let mut k = (from.edge + 1) % n;
        loop {
            pts.push(polygon.points[k]);
            if k == to.edge {
                break;
            }
            k = (k + 1) % n;
        }
        pts.push(to.point);
        build_part(pts)
    };

    let mut parts = Vec::new();
    if let Some(p) = walk(a, b) {
        parts.push(p);
    }
    if let Some(p) = walk(b, a) {
        parts.push(p);
    }
    parts
}

/// Assemble a split part, deduplicating coincident neighbors.
fn build_part(points: Vec<Point2>) -> Option<Polygon> {
    let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if cleaned.last().map_or(true, |q| (p - q).norm() > 10.0 * EPS) {
            cleaned.push(p);
        }
    }
    if cleaned.len() > 1 {
        let first = cleaned[0];
        if (cleaned[cleaned.len() - 1] - first).norm() <= 10.0 * EPS {
            cleaned.pop();
        }
    }
    Polygon::new(cleaned).ok()
}
