#![warn(missing_docs)]

//! Genetic search over sweep headings for field coverage.
//!
//! A heading is one real-valued gene in degrees. Each candidate heading is
//! scored by decomposing the field, sweeping every sub-field, and weighing
//! flight distance, coverage error, ground-vehicle linking cost and an
//! optional anchor cost against the rest of the generation. Headings are
//! snapped to a fixed grid so the expensive geometry is computed once per
//! grid angle before the generational loop starts.
//!
//! # Example
//!
//! ```ignore
//! use fieldpath_optimize::{GaSettings, GeneticOptimizer};
//!
//! let optimizer = GeneticOptimizer::new(GaSettings {
//!     seed: Some(7),
//!     ..GaSettings::default()
//! })?;
//! let best = optimizer.optimize(&field, &sweep, None, None)?;
//! println!("best heading: {:.1}°", best.angle_deg);
//! ```

pub mod error;
pub mod optimizer;
pub mod settings;

pub use error::{OptimizeError, Result};
pub use optimizer::{sweep_decomposed, GeneticOptimizer, SearchResult};
pub use settings::{FitnessWeights, GaSettings};
