//! Heading-search strategies.

use std::sync::atomic::AtomicBool;

use fieldpath_coverage::{linking_cost, SweepSettings};
use fieldpath_geom::{DecomposeSettings, Polygon, Polyline};
use fieldpath_optimize::{sweep_decomposed, GaSettings, GeneticOptimizer, OptimizeError, SearchResult};
use serde::{Deserialize, Serialize};

/// How to pick the sweep heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlannerStrategy {
    /// Full genetic search over the heading grid. Best for irregular
    /// fields.
    Genetic(GaSettings),
    /// Quick pass over 0° and 90° only, picking the shorter flight. Useful
    /// for previews and near-rectangular fields.
    AxisAligned,
}

impl Default for PlannerStrategy {
    fn default() -> Self {
        Self::Genetic(GaSettings::default())
    }
}

impl PlannerStrategy {
    /// Run the strategy on a margin-reduced field.
    pub(crate) fn run(
        &self,
        field: &Polygon,
        sweep: &SweepSettings,
        reference_route: Option<&Polyline>,
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchResult, OptimizeError> {
        match self {
            PlannerStrategy::Genetic(settings) => GeneticOptimizer::new(settings.clone())?
                .optimize(field, sweep, reference_route, cancel),
            PlannerStrategy::AxisAligned => axis_aligned(field, sweep, reference_route),
        }
    }
}

/// Evaluate 0° and 90° directly and keep the shorter non-empty flight.
fn axis_aligned(
    field: &Polygon,
    sweep: &SweepSettings,
    reference_route: Option<&Polyline>,
) -> Result<SearchResult, OptimizeError> {
    let decompose = DecomposeSettings::default();
    let ring = field.exterior();
    let target_area = field.area();

    let mut best: Option<SearchResult> = None;
    for angle in [0.0, 90.0] {
        let segments = sweep_decomposed(field, angle, sweep, &decompose);
        let waypoints: Vec<_> = segments
            .iter()
            .flat_map(|s| s.waypoints.iter().copied())
            .collect();
        if waypoints.is_empty() {
            continue;
        }
        let flight_distance: f64 = segments.iter().map(|s| s.flight_distance).sum();
        if best
            .as_ref()
            .is_some_and(|b| b.flight_distance <= flight_distance)
        {
            continue;
        }

        let covered_area: f64 = segments.iter().map(|s| s.covered_area).sum();
        let anchor_cost = reference_route
            .map(|route| fieldpath_coverage::anchor_cost(route, &waypoints))
            .unwrap_or(0.0);
        best = Some(SearchResult {
            angle_deg: angle,
            linking_cost: linking_cost(&ring, &segments),
            anchor_cost,
            coverage_error: if target_area > 0.0 {
                (covered_area - target_area).abs() / target_area
            } else {
                0.0
            },
            covered_area,
            flight_distance,
            waypoints,
            segments,
            fitness: 0.0,
            generations: 0,
        });
    }

    best.ok_or(OptimizeError::NoViableHeading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpath_geom::Point2;

    #[test]
    fn test_axis_aligned_picks_long_axis() {
        // 200x50: sweeping at 0° needs far fewer connector turns.
        let field = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(200.0, 0.0),
            Point2::new(200.0, 50.0),
            Point2::new(0.0, 50.0),
        ])
        .unwrap();
        let sweep = SweepSettings { swath_width: 10.0 };
        let result = axis_aligned(&field, &sweep, None).unwrap();
        assert_eq!(result.angle_deg, 0.0);
        // 5 lines of 200 m plus 4 connectors of 10 m.
        assert!((result.flight_distance - 1040.0).abs() < 1e-6);
    }

    #[test]
    fn test_axis_aligned_rejects_unviable_field() {
        let field = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ])
        .unwrap();
        let sweep = SweepSettings { swath_width: 10.0 };
        assert!(matches!(
            axis_aligned(&field, &sweep, None),
            Err(OptimizeError::NoViableHeading)
        ));
    }
}
