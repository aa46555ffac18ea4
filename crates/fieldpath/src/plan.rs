//! The plan handed to exporters and renderers.

use fieldpath_geom::Point2;
use fieldpath_logistics::MissionCycle;
use serde::Serialize;

/// Aggregate distances across all cycles.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PlanTotals {
    /// Everything flown, commutes and escapes included (m).
    pub flight_distance: f64,
    /// Distance flown while spraying (m).
    pub spray_distance: f64,
    /// Deadheading distance (m).
    pub transit_distance: f64,
    /// Ground-vehicle travel (m).
    pub vehicle_distance: f64,
    /// Number of mission cycles.
    pub cycle_count: usize,
}

impl PlanTotals {
    /// Sum up a cycle list.
    pub fn from_cycles(cycles: &[MissionCycle]) -> Self {
        let mut totals = Self {
            cycle_count: cycles.len(),
            ..Self::default()
        };
        for cycle in cycles {
            totals.spray_distance += cycle.spray_distance();
            totals.transit_distance += cycle.transit_distance();
            totals.vehicle_distance += cycle.vehicle_distance;
        }
        totals.flight_distance = totals.spray_distance + totals.transit_distance;
        totals
    }
}

/// A complete mission plan.
#[derive(Debug, Clone, Serialize)]
pub struct MissionPlan {
    /// Winning sweep heading (degrees).
    pub heading_deg: f64,
    /// Concatenated coverage path, before cycle cutting.
    pub waypoints: Vec<Point2>,
    /// Coverage-path flight distance (m), without commutes.
    pub flight_distance: f64,
    /// Approximate covered area (m²).
    pub covered_area: f64,
    /// Relative coverage error against the usable field area.
    pub coverage_error: f64,
    /// Fitness of the winning heading (0 for non-genetic strategies).
    pub fitness: f64,
    /// Generations the search ran (0 for non-genetic strategies).
    pub generations: usize,
    /// Tank- and battery-bounded mission cycles in flight order.
    pub cycles: Vec<MissionCycle>,
    /// Aggregates over the cycles.
    pub totals: PlanTotals,
}
