//! Ground-vehicle travel costs along shared route geometry.

use fieldpath_geom::{Point2, Polyline};

use crate::sweep::CoveragePath;

/// Shortest travel distance between two points along a closed ring.
///
/// Both points are projected onto the ring; the cheaper of the two arcs
/// between their arc-length parameters wins.
pub fn ring_distance(ring: &Polyline, a: &Point2, b: &Point2) -> f64 {
    let total = ring.length();
    if total <= 0.0 {
        return 0.0;
    }
    let da = ring.project(a);
    let db = ring.project(b);
    let linear = (da - db).abs();
    linear.min(total - linear)
}

/// Ground travel needed to link consecutive sub-field paths along the ring.
///
/// The vehicle drives from where one sub-field's path ends to where the next
/// one starts; pairs with an empty side contribute nothing.
pub fn linking_cost(ring: &Polyline, segments: &[CoveragePath]) -> f64 {
    if segments.len() < 2 {
        return 0.0;
    }
    let mut cost = 0.0;
    for pair in segments.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        if current.is_empty() || next.is_empty() {
            continue;
        }
        let end = current.waypoints[current.waypoints.len() - 1];
        let start = next.waypoints[0];
        cost += ring_distance(ring, &end, &start);
    }
    cost
}

/// Distance from a path's endpoints to their nearest points on a reference
/// route.
///
/// Penalizes plans that start or finish far from the operator's ground
/// route.
pub fn anchor_cost(route: &Polyline, waypoints: &[Point2]) -> f64 {
    match (waypoints.first(), waypoints.last()) {
        (Some(first), Some(last)) => route.distance_to(first) + route.distance_to(last),
        _ => 0.0,
    }
}
