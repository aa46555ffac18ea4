//! Resource-bounded segmentation of a coverage path into mission cycles.

use fieldpath_geom::{Point2, Polygon, Polyline};
use serde::Serialize;

use crate::error::{LogisticsError, Result};
use crate::operation::DroneOperation;
use crate::station::{MobileStation, Rendezvous};

/// Fixed reserve added to every airtime prediction (s).
const SAFETY_BUFFER_S: f64 = 120.0;

/// The escape leg to a rendezvous flies faster than working speed.
const ESCAPE_SPEED_FACTOR: f64 = 1.5;

/// Segments hugging the boundary closer than this are turn candidates (m).
const TURN_BOUNDARY_DISTANCE: f64 = 1.0;

/// Turn candidates shorter than this multiple of the swath count as
/// transit.
const TURN_LENGTH_FACTOR: f64 = 2.5;

/// One flown leg of a cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CycleSegment {
    /// Leg start.
    pub start: Point2,
    /// Leg end.
    pub end: Point2,
    /// Does this leg consume liquid?
    pub spraying: bool,
}

impl CycleSegment {
    /// Leg length (m).
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// One sortie between two resupply events.
#[derive(Debug, Clone, Serialize)]
pub struct MissionCycle {
    /// Flown points: vehicle start, the covered waypoints, the rendezvous.
    pub path: Vec<Point2>,
    /// Per-leg classification, including the commute in and the escape out.
    pub segments: Vec<CycleSegment>,
    /// Where the vehicle waited when the cycle began.
    pub vehicle_start: Point2,
    /// Rendezvous point closing the cycle.
    pub vehicle_end: Point2,
    /// Vehicle path geometry for this cycle.
    pub vehicle_path: Polyline,
    /// Vehicle travel distance for this cycle (m).
    pub vehicle_distance: f64,
}

impl MissionCycle {
    /// Total liquid sprayed in this cycle (L) at the given burn rate.
    pub fn sprayed_liters(&self, liters_per_meter: f64) -> f64 {
        self.spray_distance() * liters_per_meter
    }

    /// Distance flown while spraying (m).
    pub fn spray_distance(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.spraying)
            .map(CycleSegment::length)
            .sum()
    }

    /// Distance flown in transit (m).
    pub fn transit_distance(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| !s.spraying)
            .map(CycleSegment::length)
            .sum()
    }
}

/// Cuts a continuous coverage path into flyable cycles.
pub struct MissionSegmenter<'a> {
    operation: DroneOperation,
    station: &'a MobileStation,
    liters_per_meter: f64,
}

impl<'a> MissionSegmenter<'a> {
    /// Create a segmenter after validating the operation envelope.
    pub fn new(operation: DroneOperation, station: &'a MobileStation) -> Result<Self> {
        operation.validate()?;
        Ok(Self {
            liters_per_meter: operation.liters_per_meter(),
            operation,
            station,
        })
    }

    /// Cut `path` into mission cycles over `field`.
    ///
    /// `start_point` fixes the vehicle's initial position (projected onto
    /// its track); without it the vehicle starts at the projection of the
    /// path's first waypoint. Each pending leg is committed only if flying
    /// it AND escaping to the nearest rendezvous still fits the remaining
    /// liquid and airtime; otherwise the cycle is cut at the current point
    /// and the same leg retries against a fresh budget. A leg that fails
    /// against a fresh budget is a configuration error, not a reason to
    /// loop.
    pub fn segment(
        &self,
        field: &Polygon,
        path: &[Point2],
        start_point: Option<Point2>,
    ) -> Result<Vec<MissionCycle>> {
        if path.len() < 2 {
            return Err(LogisticsError::EmptyPath);
        }

        let speed = self.operation.work_speed;
        let escape_speed = speed * ESCAPE_SPEED_FACTOR;
        let home = start_point.unwrap_or(path[0]);
        let mut vehicle_pos = self.station.rendezvous(&home, &home).point;

        let mut cycles: Vec<MissionCycle> = Vec::new();
        let mut liquid = self.operation.tank_capacity;
        let mut airtime = (path[0] - vehicle_pos).norm() / speed;
        let mut cycle_points: Vec<Point2> = Vec::new();
        let mut cycle_segments: Vec<CycleSegment> = Vec::new();
        let mut fresh = true;

        let mut i = 0;
        while i < path.len() - 1 {
            let p1 = path[i];
            let p2 = path[i + 1];
            let spraying = self.is_spraying(&p1, &p2, field);
            let dist = (p2 - p1).norm();
            let time_step = dist / speed;
            let liquid_step = if spraying { dist * self.liters_per_meter } else { 0.0 };

            // Predict flying the leg and then escaping from its far end.
            let escape = self.station.rendezvous(&p2, &vehicle_pos);
            let escape_time = (p2 - escape.point).norm() / escape_speed;
            let predicted_time = airtime + time_step + escape_time + SAFETY_BUFFER_S;
            let predicted_liquid = liquid - liquid_step;

            let fits =
                predicted_time <= self.operation.endurance && predicted_liquid >= 0.0;

            if fits {
                cycle_segments.push(CycleSegment {
                    start: p1,
                    end: p2,
                    spraying,
                });
                cycle_points.push(p1);
                liquid -= liquid_step;
                airtime += time_step;
                fresh = false;
                i += 1;
                continue;
            }

            if fresh {
                // The leg alone blows a brand-new budget; re-cutting would
                // never converge.
                return Err(LogisticsError::ResourceInfeasible {
                    segment: i,
                    needed_time: predicted_time,
                    endurance: self.operation.endurance,
                    needed_liquid: liquid_step,
                    tank: self.operation.tank_capacity,
                });
            }

            // Cut here: close the cycle at p1 and resupply.
            cycle_points.push(p1);
            let rendezvous = self.station.rendezvous(&p1, &vehicle_pos);
            log::debug!(
                "cycle {} cut at waypoint {} ({:.1} L left, {:.0} s airborne)",
                cycles.len(),
                i,
                liquid,
                airtime
            );
            cycles.push(close_cycle(
                vehicle_pos,
                std::mem::take(&mut cycle_points),
                std::mem::take(&mut cycle_segments),
                p1,
                &rendezvous,
            ));

            vehicle_pos = rendezvous.point;
            liquid = self.operation.tank_capacity;
            airtime = (p1 - vehicle_pos).norm() / speed;
            fresh = true;
            // Same leg retries against the fresh budget.
        }

        if !cycle_segments.is_empty() {
            let last = path[path.len() - 1];
            cycle_points.push(last);
            let rendezvous = self.station.rendezvous(&last, &vehicle_pos);
            cycles.push(close_cycle(
                vehicle_pos,
                cycle_points,
                cycle_segments,
                last,
                &rendezvous,
            ));
        }

        Ok(cycles)
    }

    /// Classify a leg: spraying when its midpoint lies inside the field,
    /// except short legs hugging the boundary, which are turns.
    fn is_spraying(&self, p1: &Point2, p2: &Point2, field: &Polygon) -> bool {
        let mid = Point2::from((p1.coords + p2.coords) / 2.0);
        let boundary_distance = field.boundary_distance(&mid);
        let inside = field.contains(&mid) || boundary_distance < 1e-9;
        if !inside {
            return false;
        }

        let length = (p2 - p1).norm();
        if boundary_distance < TURN_BOUNDARY_DISTANCE
            && length < self.operation.swath_width * TURN_LENGTH_FACTOR
        {
            return false;
        }
        true
    }
}

/// Finalize a cycle: prepend the commute leg, append the escape leg, and
/// assemble the flown point list.
fn close_cycle(
    vehicle_start: Point2,
    points: Vec<Point2>,
    mut segments: Vec<CycleSegment>,
    cut_point: Point2,
    rendezvous: &Rendezvous,
) -> MissionCycle {
    debug_assert!(!segments.is_empty());

    let first_start = segments[0].start;
    segments.insert(
        0,
        CycleSegment {
            start: vehicle_start,
            end: first_start,
            spraying: false,
        },
    );
    segments.push(CycleSegment {
        start: cut_point,
        end: rendezvous.point,
        spraying: false,
    });

    let mut path = Vec::with_capacity(points.len() + 2);
    path.push(vehicle_start);
    path.extend(points);
    path.push(rendezvous.point);

    MissionCycle {
        path,
        segments,
        vehicle_start,
        vehicle_end: rendezvous.point,
        vehicle_path: rendezvous.path.clone(),
        vehicle_distance: rendezvous.distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpath_coverage::{sweep_polygon, SweepSettings};

    fn square_field() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(0.0, 100.0),
        ])
        .unwrap()
    }

    fn sweep_path(field: &Polygon) -> Vec<Point2> {
        sweep_polygon(field, 0.0, &SweepSettings { swath_width: 10.0 }).waypoints
    }

    fn operation() -> DroneOperation {
        DroneOperation {
            work_speed: 5.0,
            tank_capacity: 40.0,
            max_pump_flow: 16.0,
            endurance: 100_000.0,
            swath_width: 10.0,
            application_rate: 20.0,
        }
    }

    /// Concatenate cycle paths minus the rendezvous endpoints, collapsing
    /// the cut points shared between consecutive cycles.
    fn reconstruct(cycles: &[MissionCycle]) -> Vec<Point2> {
        let mut out: Vec<Point2> = Vec::new();
        for cycle in cycles {
            for p in &cycle.path[1..cycle.path.len() - 1] {
                if out.last().map_or(true, |q| (p - q).norm() > 1e-9) {
                    out.push(*p);
                }
            }
        }
        out
    }

    #[test]
    fn test_single_cycle_when_budget_is_generous() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        let segmenter = MissionSegmenter::new(operation(), &station).unwrap();

        let cycles = segmenter.segment(&field, &path, None).unwrap();
        assert_eq!(cycles.len(), 1);
        let cycle = &cycles[0];
        // Commute + 19 path legs + escape.
        assert_eq!(cycle.segments.len(), path.len() - 1 + 2);
        assert_eq!(cycle.path.len(), path.len() + 2);
        assert!(!cycle.segments.is_empty());
    }

    #[test]
    fn test_tank_limit_cuts_cycles() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        // 0.02 L/m on 100 m lines: 2 L per line; a 5 L tank fits two lines.
        let op = DroneOperation {
            tank_capacity: 5.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();

        let cycles = segmenter.segment(&field, &path, None).unwrap();
        assert_eq!(cycles.len(), 5);
        for cycle in &cycles {
            assert!(!cycle.segments.is_empty());
            assert!(cycle.sprayed_liters(op.liters_per_meter()) <= 5.0 + 1e-9);
        }
    }

    #[test]
    fn test_endurance_limit_cuts_cycles() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        // Each line takes 20 s, each connector 2 s, escape is instant from
        // the boundary, plus the fixed 120 s reserve: three lines and their
        // connectors fit per cycle, leaving a final one-line cycle.
        let op = DroneOperation {
            endurance: 200.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();

        let cycles = segmenter.segment(&field, &path, None).unwrap();
        assert_eq!(cycles.len(), 4);
    }

    #[test]
    fn test_reconstruction_reproduces_input_path() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        let op = DroneOperation {
            tank_capacity: 5.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();
        let cycles = segmenter.segment(&field, &path, None).unwrap();

        let rebuilt = reconstruct(&cycles);
        assert_eq!(rebuilt.len(), path.len());
        for (a, b) in rebuilt.iter().zip(path.iter()) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_spray_distance_matches_ungapped_path() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        let op = DroneOperation {
            tank_capacity: 5.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();
        let cycles = segmenter.segment(&field, &path, None).unwrap();

        let direct: f64 = path
            .windows(2)
            .filter(|w| segmenter.is_spraying(&w[0], &w[1], &field))
            .map(|w| (w[1] - w[0]).norm())
            .sum();
        let across: f64 = cycles.iter().map(MissionCycle::spray_distance).sum();
        assert!((across - direct).abs() < 1e-6);
    }

    #[test]
    fn test_resource_infeasible_is_detected() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        // One 100 m line needs 2 L; a 1 L tank can never fly it.
        let op = DroneOperation {
            tank_capacity: 1.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();

        match segmenter.segment(&field, &path, None) {
            Err(LogisticsError::ResourceInfeasible { segment, .. }) => {
                assert_eq!(segment, 0);
            }
            other => panic!("expected ResourceInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_static_station_keeps_vehicle_parked() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 0.0).unwrap();
        let op = DroneOperation {
            tank_capacity: 5.0,
            ..operation()
        };
        let segmenter = MissionSegmenter::new(op, &station).unwrap();

        let home = Point2::new(0.0, 0.0);
        let cycles = segmenter.segment(&field, &path, Some(home)).unwrap();
        assert!(cycles.len() > 1);
        for cycle in &cycles {
            assert!((cycle.vehicle_start - home).norm() < 1e-9);
            assert!((cycle.vehicle_end - home).norm() < 1e-9);
            assert_eq!(cycle.vehicle_distance, 0.0);
        }
    }

    #[test]
    fn test_turns_classified_as_transit() {
        let field = square_field();
        let path = sweep_path(&field);
        let station = MobileStation::ring_around_field(&field, 0.0, 5.0).unwrap();
        let segmenter = MissionSegmenter::new(operation(), &station).unwrap();

        let cycles = segmenter.segment(&field, &path, None).unwrap();
        let cycle = &cycles[0];
        // Interior legs alternate line/connector; the 10 m connectors on
        // the boundary are turns, not spray runs.
        let flown = &cycle.segments[1..cycle.segments.len() - 1];
        let spray_count = flown.iter().filter(|s| s.spraying).count();
        let transit_count = flown.iter().filter(|s| !s.spraying).count();
        assert_eq!(spray_count, 10);
        assert_eq!(transit_count, 9);
    }
}
