//! Whole-mission orchestration.

use std::sync::atomic::AtomicBool;

use fieldpath_coverage::SweepSettings;
use fieldpath_geom::{expand, shrink, Point2, Polygon, Polyline};
use fieldpath_logistics::{MissionSegmenter, MobileStation};

use crate::config::{PlannerConfig, SupportConfig};
use crate::error::{PlanError, Result};
use crate::plan::{MissionPlan, PlanTotals};

/// Plans complete missions from a boundary and a configuration.
pub struct MissionPlanner {
    config: PlannerConfig,
}

impl MissionPlanner {
    /// Create a planner after validating the configuration.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Plan a mission over the given boundary.
    pub fn plan(&self, boundary: Vec<Point2>) -> Result<MissionPlan> {
        self.plan_with_cancel(boundary, None)
    }

    /// Plan a mission, checking `cancel` once per optimizer generation.
    pub fn plan_with_cancel(
        &self,
        boundary: Vec<Point2>,
        cancel: Option<&AtomicBool>,
    ) -> Result<MissionPlan> {
        let mut field = Polygon::new(boundary)?;
        // A crossing boundary is the caller's problem to fix; repairing it
        // here would silently spray the wrong field.
        field.validate_simple()?;
        field.ensure_ccw();

        let safe = self.apply_margin(&field)?;
        log::debug!(
            "usable field {:.0} m² of {:.0} m² after {:.1} m margin",
            safe.area(),
            field.area(),
            self.config.safety_margin
        );

        let sweep = SweepSettings {
            swath_width: self.config.operation.swath_width,
        };
        let route = match &self.config.support {
            SupportConfig::Route { points } => Some(Polyline::new(points.clone())),
            SupportConfig::FieldPerimeter { .. } => None,
        };

        let search = self
            .config
            .strategy
            .run(&safe, &sweep, route.as_ref(), cancel)?;

        // The vehicle drives the ORIGINAL boundary (or its offset shell);
        // the margin only shrinks what the aircraft sprays.
        let station = match &self.config.support {
            SupportConfig::FieldPerimeter { offset } => {
                MobileStation::ring_around_field(&field, *offset, self.config.vehicle_speed)?
            }
            SupportConfig::Route { points } => {
                MobileStation::along_route(points.clone(), self.config.vehicle_speed)?
            }
        };

        let segmenter = MissionSegmenter::new(self.config.operation, &station)?;
        let cycles = segmenter.segment(&safe, &search.waypoints, None)?;
        let totals = PlanTotals::from_cycles(&cycles);

        log::info!(
            "planned {} cycles at {:.1}°: {:.0} m flight, {:.0} m vehicle travel",
            totals.cycle_count,
            search.angle_deg,
            totals.flight_distance,
            totals.vehicle_distance
        );

        Ok(MissionPlan {
            heading_deg: search.angle_deg,
            waypoints: search.waypoints,
            flight_distance: search.flight_distance,
            covered_area: search.covered_area,
            coverage_error: search.coverage_error,
            fitness: search.fitness,
            generations: search.generations,
            cycles,
            totals,
        })
    }

    /// Shrink the boundary by the safety margin, detecting collapse.
    ///
    /// Shrinking reports failure through its output, not an error: the
    /// result may be unchanged, wound backwards, or — when opposite edges
    /// pass through each other — a small phantom polygon that is still
    /// simple and CCW. Expanding the result back by the same margin
    /// exposes all three: a healthy offset round-trips onto the original
    /// boundary, a collapsed one does not.
    fn apply_margin(&self, field: &Polygon) -> Result<Polygon> {
        let margin = self.config.safety_margin;
        if margin <= 0.0 {
            return Ok(field.clone());
        }
        let safe = shrink(field, margin);
        let restored = expand(&safe, margin);
        let collapsed = !safe.is_ccw()
            || safe.area() >= field.area()
            || (restored.area() - field.area()).abs() > 0.01 * field.area();
        if collapsed {
            return Err(PlanError::MarginTooLarge { margin });
        }
        Ok(safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PlannerStrategy;
    use fieldpath_logistics::DroneOperation;
    use fieldpath_optimize::GaSettings;

    fn square(side: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ]
    }

    fn base_config() -> PlannerConfig {
        PlannerConfig {
            operation: DroneOperation {
                work_speed: 5.0,
                tank_capacity: 40.0,
                max_pump_flow: 16.0,
                endurance: 1800.0,
                swath_width: 10.0,
                application_rate: 20.0,
            },
            safety_margin: 2.0,
            vehicle_speed: 5.0,
            support: SupportConfig::FieldPerimeter { offset: 0.0 },
            strategy: PlannerStrategy::AxisAligned,
        }
    }

    #[test]
    fn test_square_field_scenario() {
        let planner = MissionPlanner::new(base_config()).unwrap();
        let plan = planner.plan(square(100.0)).unwrap();

        // 2 m margin leaves a 96x96 field; heading 0° lays ten zig-zag
        // lines across it.
        assert_eq!(plan.heading_deg, 0.0);
        assert_eq!(plan.waypoints.len(), 20);
        assert!((plan.flight_distance - (10.0 * 96.0 + 9.0 * 10.0)).abs() < 1e-6);
        assert!(!plan.cycles.is_empty());
        assert_eq!(plan.totals.cycle_count, plan.cycles.len());
        // Flown totals cover at least the coverage path (commute/escape
        // legs only add).
        assert!(plan.totals.flight_distance >= plan.flight_distance - 1e-6);
    }

    #[test]
    fn test_genetic_strategy_end_to_end() {
        let mut config = base_config();
        config.strategy = PlannerStrategy::Genetic(GaSettings {
            population_size: 40,
            generations: 40,
            stall_window: 20,
            angle_step_deg: 5.0,
            seed: Some(13),
            ..GaSettings::default()
        });
        let planner = MissionPlanner::new(config).unwrap();
        let plan = planner.plan(square(100.0)).unwrap();

        assert!(plan.fitness > 0.0);
        assert!(plan.generations > 0);
        assert!(!plan.waypoints.is_empty());
        assert!(!plan.cycles.is_empty());
    }

    #[test]
    fn test_self_intersecting_boundary_rejected() {
        let planner = MissionPlanner::new(base_config()).unwrap();
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
            Point2::new(0.0, 100.0),
        ];
        assert!(matches!(
            planner.plan(bowtie),
            Err(PlanError::Geometry(
                fieldpath_geom::GeomError::SelfIntersecting { .. }
            ))
        ));
    }

    #[test]
    fn test_margin_collapse_rejected() {
        let mut config = base_config();
        config.safety_margin = 6.0;
        let planner = MissionPlanner::new(config).unwrap();
        assert!(matches!(
            planner.plan(square(10.0)),
            Err(PlanError::MarginTooLarge { .. })
        ));
    }

    #[test]
    fn test_route_support_end_to_end() {
        let mut config = base_config();
        config.support = SupportConfig::Route {
            points: vec![Point2::new(-5.0, 0.0), Point2::new(-5.0, 100.0)],
        };
        let planner = MissionPlanner::new(config).unwrap();
        let plan = planner.plan(square(100.0)).unwrap();
        assert!(!plan.cycles.is_empty());
        // Every rendezvous sits on the route at x = -5.
        for cycle in &plan.cycles {
            assert!((cycle.vehicle_end.x - (-5.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cw_boundary_accepted() {
        let planner = MissionPlanner::new(base_config()).unwrap();
        let mut boundary = square(100.0);
        boundary.reverse();
        let plan = planner.plan(boundary).unwrap();
        assert_eq!(plan.waypoints.len(), 20);
    }
}
