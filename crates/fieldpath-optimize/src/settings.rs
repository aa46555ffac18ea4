//! Search parameters.

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};

/// Genetic-algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaSettings {
    /// Initial population size.
    pub population_size: usize,
    /// Maximum number of generations.
    pub generations: usize,
    /// Probability of arithmetic crossover per parent pair.
    pub crossover_rate: f64,
    /// Probability of Gaussian mutation per child.
    pub mutation_rate: f64,
    /// Standard deviation of the mutation noise (degrees).
    pub mutation_sigma_deg: f64,
    /// Heading grid step for evaluation memoization (degrees).
    pub angle_step_deg: f64,
    /// Consecutive low-improvement generations tolerated before stopping.
    pub stall_window: usize,
    /// Relative fitness improvement below which a generation counts as
    /// stalled.
    pub min_improvement: f64,
    /// Population fractions for the exploration, convergence and refinement
    /// phases, applied over generation thirds.
    pub phase_fractions: [f64; 3],
    /// RNG seed; `None` seeds from the OS for non-reproducible runs.
    pub seed: Option<u64>,
}

impl Default for GaSettings {
    fn default() -> Self {
        Self {
            population_size: 200,
            generations: 300,
            crossover_rate: 0.4,
            mutation_rate: 0.01,
            mutation_sigma_deg: 10.0,
            angle_step_deg: 1.0,
            stall_window: 50,
            min_improvement: 1e-5,
            phase_fractions: [1.0, 0.5, 0.25],
            seed: None,
        }
    }
}

impl GaSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(OptimizeError::InvalidSettings(
                "population_size must be at least 2".into(),
            ));
        }
        if self.generations == 0 {
            return Err(OptimizeError::InvalidSettings(
                "generations must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(OptimizeError::InvalidSettings(
                "crossover_rate must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptimizeError::InvalidSettings(
                "mutation_rate must be between 0 and 1".into(),
            ));
        }
        if self.mutation_sigma_deg <= 0.0 {
            return Err(OptimizeError::InvalidSettings(
                "mutation_sigma_deg must be positive".into(),
            ));
        }
        if self.angle_step_deg <= 0.0 || self.angle_step_deg > 360.0 {
            return Err(OptimizeError::InvalidSettings(
                "angle_step_deg must be in (0, 360]".into(),
            ));
        }
        if self.phase_fractions.iter().any(|f| !(0.0..=1.0).contains(f) || *f == 0.0) {
            return Err(OptimizeError::InvalidSettings(
                "phase_fractions must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Weights of the normalized fitness terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessWeights {
    /// Flight distance weight.
    pub flight_distance: f64,
    /// Coverage-error weight.
    pub coverage_error: f64,
    /// Anchor-cost weight, applied only when a reference route is supplied.
    pub anchor: f64,
    /// Ground-vehicle linking-cost weight.
    pub linking: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            flight_distance: 1.0,
            coverage_error: 1.0,
            anchor: 5.0,
            linking: 2.0,
        }
    }
}
