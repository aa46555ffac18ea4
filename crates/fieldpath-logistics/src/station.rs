//! Rendezvous computation on a shared vehicle track.

use fieldpath_geom::{expand, Point2, Polygon, Polyline};
use serde::Serialize;

use crate::error::{LogisticsError, Result};

/// Below this speed the vehicle counts as parked.
pub const STATIC_SPEED_THRESHOLD: f64 = 0.1;

/// Fixed safety margin subtracted from the remaining endurance when judging
/// whether the vehicle arrives in time (s).
pub const FEASIBILITY_MARGIN_S: f64 = 60.0;

/// The geometry the ground vehicle is allowed to drive on.
#[derive(Debug, Clone)]
pub enum SupportTrack {
    /// A closed ring; travel wraps around through the ring origin.
    Ring(Polyline),
    /// An open route; travel follows the arc-length parameterization.
    Route(Polyline),
}

impl SupportTrack {
    fn polyline(&self) -> &Polyline {
        match self {
            SupportTrack::Ring(line) | SupportTrack::Route(line) => line,
        }
    }
}

/// A resupply meeting point with the vehicle's way there.
#[derive(Debug, Clone, Serialize)]
pub struct Rendezvous {
    /// Meeting point on the track (or the parked position).
    pub point: Point2,
    /// Vehicle path from its current position to the meeting point.
    pub path: Polyline,
    /// Vehicle travel distance (m).
    pub distance: f64,
    /// Vehicle travel time (s); zero for a parked vehicle.
    pub travel_time: f64,
}

/// A mobile resupply station bound to a track.
#[derive(Debug, Clone)]
pub struct MobileStation {
    track: SupportTrack,
    speed: f64,
}

impl MobileStation {
    /// Create a station on a track.
    ///
    /// Rejects zero-length tracks up front; every rendezvous divides by the
    /// track's arc length.
    pub fn new(track: SupportTrack, speed_mps: f64) -> Result<Self> {
        if track.polyline().length() <= 0.0 {
            return Err(LogisticsError::ZeroLengthTrack);
        }
        Ok(Self {
            track,
            speed: speed_mps,
        })
    }

    /// Station driving the field perimeter, pushed outward by `offset`
    /// meters when positive.
    pub fn ring_around_field(field: &Polygon, offset: f64, speed_mps: f64) -> Result<Self> {
        // Offsets below 10 cm are treated as driving the boundary itself.
        let ring = if offset > 0.1 {
            expand(field, offset).exterior()
        } else {
            field.exterior()
        };
        Self::new(SupportTrack::Ring(ring), speed_mps)
    }

    /// Station driving an operator-drawn open route.
    pub fn along_route(points: Vec<Point2>, speed_mps: f64) -> Result<Self> {
        Self::new(SupportTrack::Route(Polyline::new(points)), speed_mps)
    }

    /// Vehicle speed (m/s).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Is the vehicle effectively parked?
    pub fn is_static(&self) -> bool {
        self.speed < STATIC_SPEED_THRESHOLD
    }

    /// Compute the rendezvous for an aircraft leaving at `drone_exit` while
    /// the vehicle sits at `vehicle_pos`.
    ///
    /// The meeting point is the nearest projection of the exit position
    /// onto the track. On a ring the vehicle takes the shorter of the two
    /// arcs; on an open route it follows the route, against its
    /// parameterization when needed. A parked vehicle never moves: the
    /// rendezvous collapses to its position.
    pub fn rendezvous(&self, drone_exit: &Point2, vehicle_pos: &Point2) -> Rendezvous {
        if self.is_static() {
            return Rendezvous {
                point: *vehicle_pos,
                path: Polyline::new(vec![*vehicle_pos]),
                distance: 0.0,
                travel_time: 0.0,
            };
        }

        let line = self.track.polyline();
        let target_s = line.project(drone_exit);
        let vehicle_s = line.project(vehicle_pos);
        let point = line.point_at(target_s);

        let (distance, path) = match &self.track {
            SupportTrack::Ring(ring) => {
                let total = ring.length();
                let forward = (target_s - vehicle_s).rem_euclid(total);
                let backward = total - forward;
                if forward <= backward {
                    (forward, extract_wrapped(ring, vehicle_s, target_s))
                } else {
                    (backward, extract_wrapped(ring, target_s, vehicle_s).reversed())
                }
            }
            SupportTrack::Route(route) => {
                let distance = (target_s - vehicle_s).abs();
                let path = if target_s >= vehicle_s {
                    route.extract(vehicle_s, target_s)
                } else {
                    route.extract(target_s, vehicle_s).reversed()
                };
                (distance, path)
            }
        };

        Rendezvous {
            point,
            path,
            distance,
            travel_time: distance / self.speed,
        }
    }

    /// Can the vehicle make it before the aircraft runs dry?
    pub fn is_feasible(&self, travel_time: f64, remaining_endurance: f64) -> bool {
        travel_time < remaining_endurance - FEASIBILITY_MARGIN_S
    }
}

/// Forward slice of a ring from `s0` to `s1`, wrapping through the ring
/// origin when `s1 < s0`.
fn extract_wrapped(ring: &Polyline, s0: f64, s1: f64) -> Polyline {
    if s1 >= s0 {
        return ring.extract(s0, s1);
    }
    let head = ring.extract(s0, ring.length());
    let tail = ring.extract(0.0, s1);
    let mut points = head.points;
    for p in tail.points {
        if points.last().map_or(true, |q| (p - q).norm() > 1e-9) {
            points.push(p);
        }
    }
    Polyline::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_field() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_ring_takes_shorter_arc() {
        let station = MobileStation::ring_around_field(&square_field(), 0.0, 5.0).unwrap();
        // Vehicle at the origin corner, aircraft exiting near the left edge:
        // the wraparound arc (60 m) beats the forward arc (340 m).
        let rv = station.rendezvous(&Point2::new(-5.0, 60.0), &Point2::new(0.0, 0.0));
        assert!((rv.point - Point2::new(0.0, 60.0)).norm() < 1e-9);
        assert!((rv.distance - 60.0).abs() < 1e-9);
        assert!((rv.travel_time - 12.0).abs() < 1e-9);
        // Path runs from the vehicle to the meeting point.
        assert!((rv.path.points[0] - Point2::new(0.0, 0.0)).norm() < 1e-9);
        assert!((rv.path.points[rv.path.len() - 1] - Point2::new(0.0, 60.0)).norm() < 1e-9);
        assert!((rv.path.length() - rv.distance).abs() < 1e-9);
    }

    #[test]
    fn test_ring_distance_is_min_of_arcs() {
        let station = MobileStation::ring_around_field(&square_field(), 0.0, 5.0).unwrap();
        // Points 150 m apart along the ring; perimeter 400 m.
        let rv = station.rendezvous(&Point2::new(100.0, 50.0), &Point2::new(0.0, 0.0));
        assert!((rv.distance - 150.0_f64.min(400.0 - 150.0)).abs() < 1e-9);
    }

    #[test]
    fn test_offset_ring_sits_outside_field() {
        let field = square_field();
        let station = MobileStation::ring_around_field(&field, 5.0, 5.0).unwrap();
        // Exit closest to the bottom edge; the expanded ring runs at y = -5.
        let rv = station.rendezvous(&Point2::new(50.0, 40.0), &Point2::new(50.0, -5.0));
        assert!((rv.point - Point2::new(50.0, -5.0)).norm() < 1e-9);
        assert!(!field.contains(&rv.point));
    }

    #[test]
    fn test_open_route_no_wraparound() {
        let station = MobileStation::along_route(
            vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
            5.0,
        )
        .unwrap();
        // Vehicle ahead of the target: travel runs against the route
        // parameterization and the geometry is reversed accordingly.
        let rv = station.rendezvous(&Point2::new(20.0, 30.0), &Point2::new(80.0, 0.0));
        assert!((rv.point - Point2::new(20.0, 0.0)).norm() < 1e-9);
        assert!((rv.distance - 60.0).abs() < 1e-9);
        assert!((rv.path.points[0] - Point2::new(80.0, 0.0)).norm() < 1e-9);
        assert!((rv.path.points[rv.path.len() - 1] - Point2::new(20.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_static_vehicle_never_moves() {
        let station = MobileStation::ring_around_field(&square_field(), 0.0, 0.05).unwrap();
        let home = Point2::new(0.0, 0.0);
        let rv = station.rendezvous(&Point2::new(80.0, 90.0), &home);
        assert!((rv.point - home).norm() < 1e-9);
        assert_eq!(rv.distance, 0.0);
        assert_eq!(rv.travel_time, 0.0);
    }

    #[test]
    fn test_zero_length_track_rejected() {
        let p = Point2::new(3.0, 4.0);
        match MobileStation::along_route(vec![p, p], 5.0) {
            Err(LogisticsError::ZeroLengthTrack) => {}
            other => panic!("expected ZeroLengthTrack, got {other:?}"),
        }
    }

    #[test]
    fn test_feasibility_margin() {
        let station = MobileStation::ring_around_field(&square_field(), 0.0, 5.0).unwrap();
        assert!(station.is_feasible(100.0, 161.0));
        assert!(!station.is_feasible(100.0, 160.0));
    }
}
