//! Analytic boundary offsetting for safety margins.
//!
//! Each vertex moves along its angle bisector by `h / sin(θ/2)`, which keeps
//! every edge at distance `h` from its original line. The magnitude diverges
//! as the vertex angle approaches zero: a needle vertex cannot be safely
//! shrunk, and the caller sees that as a degenerate result rather than an
//! error.

use crate::{Polygon, Vec2};

const UNIT_EPS: f64 = 1e-6;

/// Contract a boundary inward by `h` meters.
///
/// Returns the input unchanged when the boundary is too small to offset;
/// callers detect failure by comparing the result against the input.
pub fn shrink(polygon: &Polygon, h: f64) -> Polygon {
    offset(polygon, h, true)
}

/// Push a boundary outward by `h` meters.
///
/// Used to build a vehicle track that rings the field at a standoff
/// distance.
pub fn expand(polygon: &Polygon, h: f64) -> Polygon {
    offset(polygon, h, false)
}

fn offset(polygon: &Polygon, h: f64, inward: bool) -> Polygon {
    if polygon.len() < 3 {
        return polygon.clone();
    }

    // Work on a counter-clockwise copy so the concavity sign is consistent.
    let mut ccw = polygon.clone();
    ccw.ensure_ccw();
    let coords = &ccw.points;
    let n = coords.len();

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = coords[(i + n - 1) % n];
        let curr = coords[i];
        let next = coords[(i + 1) % n];

        let vec_prev = prev - curr;
        let vec_next = next - curr;
        let len_prev = vec_prev.norm();
        let len_next = vec_next.norm();

        // Duplicate neighbors leave the vertex unmoved.
        if len_prev < UNIT_EPS || len_next < UNIT_EPS {
            out.push(curr);
            continue;
        }

        let u_prev = vec_prev / len_prev;
        let u_next = vec_next / len_next;

        // Interior half-angle from the dot product, clamped against
        // numerical overshoot before arccos.
        let dot = u_prev.dot(&u_next).clamp(-1.0, 1.0);
        let theta = dot.acos();

        // cross < 0 marks a right turn on a CCW boundary: a concave vertex.
        let cross = u_next.x * u_prev.y - u_next.y * u_prev.x;
        let is_convex = cross > 0.0;

        let sin_half = (theta / 2.0).sin();
        let magnitude = if sin_half < UNIT_EPS { h } else { h / sin_half };

        // Bisector of the two edge directions; antipodal neighbors leave it
        // degenerate, in which case the perpendicular of the outgoing edge
        // stands in.
        let bisector = u_prev + u_next;
        let dir: Vec2 = if bisector.norm() < UNIT_EPS {
            Vec2::new(-u_next.y, u_next.x)
        } else {
            bisector.normalize()
        };

        // At a convex vertex the bisector points into the interior; at a
        // concave vertex it points out, so the shift flips sign.
        let mut movement = if is_convex { dir * magnitude } else { -dir * magnitude };
        if !inward {
            movement = -movement;
        }

        out.push(curr + movement);
    }

    if out.len() < 3 {
        return polygon.clone();
    }
    Polygon { points: out }
}
