//! The generational heading search.

use std::sync::atomic::{AtomicBool, Ordering};

use fieldpath_coverage::{linking_cost, sweep_polygon, CoveragePath, SweepSettings};
use fieldpath_geom::{decompose, DecomposeSettings, Point2, Polygon, Polyline};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{OptimizeError, Result};
use crate::settings::{FitnessWeights, GaSettings};

/// Decompose a field for a heading and sweep every sub-field at it.
///
/// This is the evaluation primitive of the search; it is also what a
/// non-genetic strategy calls directly for a fixed heading.
pub fn sweep_decomposed(
    field: &Polygon,
    heading_deg: f64,
    sweep: &SweepSettings,
    decompose_settings: &DecomposeSettings,
) -> Vec<CoveragePath> {
    decompose(field, heading_deg, decompose_settings)
        .iter()
        .map(|part| sweep_polygon(part, heading_deg, sweep))
        .collect()
}

/// Outcome of a heading search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Winning heading (degrees, snapped to the evaluation grid).
    pub angle_deg: f64,
    /// Concatenated waypoints across all sub-field paths.
    pub waypoints: Vec<Point2>,
    /// Per-sub-field coverage paths in flight order.
    pub segments: Vec<CoveragePath>,
    /// Total flight distance (m).
    pub flight_distance: f64,
    /// Approximate covered area (m²).
    pub covered_area: f64,
    /// Relative coverage error against the field area.
    pub coverage_error: f64,
    /// Ground-vehicle cost linking sub-field paths along the perimeter (m).
    pub linking_cost: f64,
    /// Endpoint distance to the reference route (m); zero without a route.
    pub anchor_cost: f64,
    /// Fitness of the winner within its final generation scaling.
    pub fitness: f64,
    /// Generations actually evaluated.
    pub generations: usize,
}

/// Precomputed evaluation of one grid heading.
///
/// Built once per search, before the generational loop, and read-only
/// afterwards — individuals only index into this table.
struct AngleEntry {
    angle_deg: f64,
    segments: Vec<CoveragePath>,
    flight_distance: f64,
    covered_area: f64,
    coverage_error: f64,
    linking: f64,
    anchor: f64,
    is_empty: bool,
}

impl AngleEntry {
    fn build(
        angle_deg: f64,
        field: &Polygon,
        ring: &Polyline,
        reference_route: Option<&Polyline>,
        target_area: f64,
        sweep: &SweepSettings,
        decompose_settings: &DecomposeSettings,
    ) -> Self {
        let segments = sweep_decomposed(field, angle_deg, sweep, decompose_settings);
        let flight_distance: f64 = segments.iter().map(|s| s.flight_distance).sum();
        let covered_area: f64 = segments.iter().map(|s| s.covered_area).sum();
        let is_empty = segments.iter().all(CoveragePath::is_empty);

        let coverage_error = if target_area > 0.0 {
            (covered_area - target_area).abs() / target_area
        } else {
            0.0
        };
        let linking = linking_cost(ring, &segments);

        let anchor = match reference_route {
            Some(route) if !is_empty => {
                let first = segments
                    .iter()
                    .find(|s| !s.is_empty())
                    .and_then(|s| s.waypoints.first());
                let last = segments
                    .iter()
                    .rev()
                    .find(|s| !s.is_empty())
                    .and_then(|s| s.waypoints.last());
                match (first, last) {
                    (Some(a), Some(b)) => route.distance_to(a) + route.distance_to(b),
                    _ => 0.0,
                }
            }
            _ => 0.0,
        };

        Self {
            angle_deg,
            segments,
            flight_distance,
            covered_area,
            coverage_error,
            linking,
            anchor,
            is_empty,
        }
    }
}

/// Best individual seen so far.
#[derive(Debug, Clone, Copy)]
struct BestSoFar {
    index: usize,
    angle_deg: f64,
    fitness: f64,
}

/// Genetic search over sweep headings.
pub struct GeneticOptimizer {
    settings: GaSettings,
    weights: FitnessWeights,
    decompose: DecomposeSettings,
}

impl GeneticOptimizer {
    /// Create an optimizer after validating the settings.
    pub fn new(settings: GaSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            weights: FitnessWeights::default(),
            decompose: DecomposeSettings::default(),
        })
    }

    /// Override the fitness weights.
    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Override the decomposition tuning.
    pub fn with_decompose(mut self, settings: DecomposeSettings) -> Self {
        self.decompose = settings;
        self
    }

    /// Search for the heading minimizing the weighted coverage costs.
    ///
    /// `reference_route` enables the anchor fitness term. `cancel` is
    /// checked once per generation; on cancellation the best individual so
    /// far is returned.
    pub fn optimize(
        &self,
        field: &Polygon,
        sweep: &SweepSettings,
        reference_route: Option<&Polyline>,
        cancel: Option<&AtomicBool>,
    ) -> Result<SearchResult> {
        let steps = (360.0 / self.settings.angle_step_deg).round().max(1.0) as usize;
        let step = 360.0 / steps as f64;
        let ring = field.exterior();
        let target_area = field.area();

        // Evaluation cache: every grid heading priced up front, in
        // parallel. The generational loop never mutates it.
        let cache: Vec<AngleEntry> = (0..steps)
            .into_par_iter()
            .map(|k| {
                AngleEntry::build(
                    k as f64 * step,
                    field,
                    &ring,
                    reference_route,
                    target_area,
                    sweep,
                    &self.decompose,
                )
            })
            .collect();

        if cache.iter().all(|e| e.is_empty) {
            return Err(OptimizeError::NoViableHeading);
        }

        let mut rng = match self.settings.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        let normal = Normal::new(0.0, self.settings.mutation_sigma_deg)
            .map_err(|e| OptimizeError::InvalidSettings(e.to_string()))?;

        let initial_pop = self.settings.population_size;
        let mut population: Vec<f64> = (0..initial_pop)
            .map(|_| rng.random_range(0.0..360.0))
            .collect();

        let mut best: Option<BestSoFar> = None;
        let mut stall = 0usize;
        let mut generations_run = 0usize;

        for gen in 0..self.settings.generations {
            generations_run = gen + 1;
            let prev_fitness = best.map(|b| b.fitness);

            // Score the generation against the read-only cache.
            let indices: Vec<usize> = population
                .iter()
                .map(|&a| grid_index(a, steps, step))
                .collect();
            let fitness = self.score(&cache, &indices, reference_route.is_some());

            for (i, &ci) in indices.iter().enumerate() {
                let f = fitness[i];
                if best.map_or(true, |b| f > b.fitness) {
                    best = Some(BestSoFar {
                        index: ci,
                        angle_deg: cache[ci].angle_deg,
                        fitness: f,
                    });
                }
            }

            if let (Some(prev), Some(b)) = (prev_fitness, best) {
                let rel = (b.fitness - prev) / prev.max(f64::MIN_POSITIVE);
                if rel < self.settings.min_improvement {
                    stall += 1;
                } else {
                    stall = 0;
                }
                if stall >= self.settings.stall_window {
                    log::debug!(
                        "heading search converged after {} generations (best {:.2}°)",
                        generations_run,
                        b.angle_deg
                    );
                    break;
                }
            }

            if generations_run % 50 == 0 {
                if let Some(b) = best {
                    log::debug!(
                        "generation {}/{}: best fitness {:.4} at {:.2}°",
                        generations_run,
                        self.settings.generations,
                        b.fitness,
                        b.angle_deg
                    );
                }
            }

            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                log::info!("heading search cancelled at generation {generations_run}");
                break;
            }

            // Breed the next generation, shrinking through the phases.
            let next_size = self.phase_population(gen);
            let mut next = Vec::with_capacity(next_size);
            if let Some(b) = best {
                // Elitism: the best individual always survives.
                next.push(b.angle_deg);
            }
            while next.len() < next_size {
                let p1 = roulette(&population, &fitness, &mut rng);
                let p2 = roulette(&population, &fitness, &mut rng);
                let (c1, c2) = if rng.random::<f64>() < self.settings.crossover_rate {
                    let alpha: f64 = rng.random();
                    (
                        (alpha * p1 + (1.0 - alpha) * p2).rem_euclid(360.0),
                        ((1.0 - alpha) * p1 + alpha * p2).rem_euclid(360.0),
                    )
                } else {
                    (p1, p2)
                };
                next.push(self.mutate(c1, &normal, &mut rng));
                if next.len() < next_size {
                    next.push(self.mutate(c2, &normal, &mut rng));
                }
            }
            population = next;
        }

        let best = best.ok_or(OptimizeError::NoViableHeading)?;
        let entry = &cache[best.index];
        let waypoints: Vec<Point2> = entry
            .segments
            .iter()
            .flat_map(|s| s.waypoints.iter().copied())
            .collect();

        log::info!(
            "best heading {:.2}° after {} generations: {:.0} m flight, {:.1}% coverage error",
            entry.angle_deg,
            generations_run,
            entry.flight_distance,
            entry.coverage_error * 100.0
        );

        Ok(SearchResult {
            angle_deg: entry.angle_deg,
            waypoints,
            segments: entry.segments.clone(),
            flight_distance: entry.flight_distance,
            covered_area: entry.covered_area,
            coverage_error: entry.coverage_error,
            linking_cost: entry.linking,
            anchor_cost: entry.anchor,
            fitness: best.fitness,
            generations: generations_run,
        })
    }

    /// Normalized weighted fitness for one generation.
    ///
    /// Each raw cost divides by its population L2 norm, making fitness
    /// scale-invariant across generations; empty-path individuals score
    /// zero, the worst possible value.
    fn score(&self, cache: &[AngleEntry], indices: &[usize], with_anchor: bool) -> Vec<f64> {
        let l2 = |f: &dyn Fn(&AngleEntry) -> f64| -> f64 {
            let sum: f64 = indices.iter().map(|&i| f(&cache[i]).powi(2)).sum();
            if sum > 0.0 {
                sum.sqrt()
            } else {
                1.0
            }
        };
        let norm_flight = l2(&|e| e.flight_distance);
        let norm_cov = l2(&|e| e.coverage_error);
        let norm_link = l2(&|e| e.linking);
        let norm_anchor = l2(&|e| e.anchor);

        indices
            .iter()
            .map(|&i| {
                let e = &cache[i];
                if e.is_empty {
                    return 0.0;
                }
                let mut cost = self.weights.flight_distance * e.flight_distance / norm_flight
                    + self.weights.coverage_error * e.coverage_error / norm_cov
                    + self.weights.linking * e.linking / norm_link;
                if with_anchor {
                    cost += self.weights.anchor * e.anchor / norm_anchor;
                }
                if cost > 0.0 {
                    1.0 / cost
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Population size for the phase containing `gen`.
    fn phase_population(&self, gen: usize) -> usize {
        let third = self.settings.generations.div_ceil(3).max(1);
        let phase = (gen / third).min(2);
        let size = self.settings.population_size as f64 * self.settings.phase_fractions[phase];
        (size.round() as usize).max(2)
    }

    fn mutate(&self, angle: f64, normal: &Normal<f64>, rng: &mut Pcg32) -> f64 {
        if rng.random::<f64>() < self.settings.mutation_rate {
            (angle + normal.sample(rng)).rem_euclid(360.0)
        } else {
            angle
        }
    }
}

/// Snap an angle onto the evaluation grid.
fn grid_index(angle_deg: f64, steps: usize, step: f64) -> usize {
    ((angle_deg.rem_euclid(360.0) / step).round() as usize) % steps
}

/// Fitness-proportional roulette selection.
fn roulette(population: &[f64], fitness: &[f64], rng: &mut Pcg32) -> f64 {
    let total: f64 = fitness.iter().sum();
    if total <= 0.0 {
        return population[rng.random_range(0..population.len())];
    }
    let pick = rng.random_range(0.0..total);
    let mut acc = 0.0;
    for (angle, f) in population.iter().zip(fitness) {
        acc += f;
        if acc > pick {
            return *angle;
        }
    }
    population[population.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f64, h: f64) -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ])
        .unwrap()
    }

    fn quick_settings(seed: u64) -> GaSettings {
        GaSettings {
            population_size: 60,
            generations: 80,
            stall_window: 40,
            angle_step_deg: 5.0,
            seed: Some(seed),
            ..GaSettings::default()
        }
    }

    #[test]
    fn test_converges_to_long_axis() {
        let sweep = SweepSettings { swath_width: 10.0 };
        for (w, h) in [(200.0, 50.0), (300.0, 60.0), (150.0, 30.0)] {
            let field = rect(w, h);
            let optimizer = GeneticOptimizer::new(quick_settings(7)).unwrap();
            let best = optimizer.optimize(&field, &sweep, None, None).unwrap();

            // The long axis lies along x; the winning heading folds to
            // within 20° of it.
            let fold = best.angle_deg.rem_euclid(180.0);
            let axis_distance = fold.min(180.0 - fold);
            assert!(
                axis_distance < 20.0,
                "{w}x{h}: heading {:.1}° is {axis_distance:.1}° off axis",
                best.angle_deg
            );
            assert!(best.fitness > 0.0);
        }
    }

    #[test]
    fn test_square_matches_axis_aligned_sweep() {
        let field = rect(100.0, 100.0);
        let sweep = SweepSettings { swath_width: 10.0 };
        let optimizer = GeneticOptimizer::new(quick_settings(3)).unwrap();
        let best = optimizer.optimize(&field, &sweep, None, None).unwrap();

        // Axis-aligned sweeps need 1090 m (ten 100 m lines, nine 10 m
        // connectors); the grid guarantees those headings are reachable.
        assert!(best.flight_distance <= 1090.0 + 1e-6);
        assert!(best.coverage_error < 1e-9);
    }

    #[test]
    fn test_seed_makes_search_deterministic() {
        let field = rect(120.0, 40.0);
        let sweep = SweepSettings { swath_width: 8.0 };
        let run = || {
            GeneticOptimizer::new(quick_settings(42))
                .unwrap()
                .optimize(&field, &sweep, None, None)
                .unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.angle_deg, b.angle_deg);
        assert_eq!(a.fitness, b.fitness);
        assert_eq!(a.generations, b.generations);
    }

    #[test]
    fn test_unviable_field_errors() {
        // Far thinner than half a swath in every direction.
        let field = rect(2.0, 2.0);
        let sweep = SweepSettings { swath_width: 10.0 };
        let optimizer = GeneticOptimizer::new(quick_settings(1)).unwrap();
        match optimizer.optimize(&field, &sweep, None, None) {
            Err(OptimizeError::NoViableHeading) => {}
            other => panic!("expected NoViableHeading, got {other:?}"),
        }
    }

    #[test]
    fn test_early_stop_cuts_generations() {
        let field = rect(100.0, 100.0);
        let sweep = SweepSettings { swath_width: 10.0 };
        let settings = GaSettings {
            population_size: 50,
            generations: 400,
            stall_window: 5,
            angle_step_deg: 5.0,
            seed: Some(11),
            ..GaSettings::default()
        };
        let best = GeneticOptimizer::new(settings)
            .unwrap()
            .optimize(&field, &sweep, None, None)
            .unwrap();
        assert!(best.generations < 400);
    }

    #[test]
    fn test_cancellation_stops_after_current_generation() {
        let field = rect(100.0, 100.0);
        let sweep = SweepSettings { swath_width: 10.0 };
        let cancel = AtomicBool::new(true);
        let best = GeneticOptimizer::new(quick_settings(5))
            .unwrap()
            .optimize(&field, &sweep, None, Some(&cancel))
            .unwrap();
        assert_eq!(best.generations, 1);
    }

    #[test]
    fn test_anchor_pulls_endpoints_toward_route() {
        let field = rect(100.0, 100.0);
        let sweep = SweepSettings { swath_width: 10.0 };
        // A route along the bottom edge.
        let route = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        let optimizer = GeneticOptimizer::new(quick_settings(9)).unwrap();
        let best = optimizer
            .optimize(&field, &sweep, Some(&route), None)
            .unwrap();
        // Anchor cost is reported and finite.
        assert!(best.anchor_cost.is_finite());
        assert!(!best.waypoints.is_empty());
    }
}
