//! Error type for whole-mission planning.

use thiserror::Error;

/// Errors that can occur while planning a mission.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The field boundary is unusable (too few vertices, self-intersecting).
    ///
    /// A crossing boundary is reported, never silently repaired.
    #[error("field boundary: {0}")]
    Geometry(#[from] fieldpath_geom::GeomError),

    /// The safety margin consumed the field.
    #[error("safety margin {margin} m leaves no usable field")]
    MarginTooLarge {
        /// The margin that was applied (m).
        margin: f64,
    },

    /// Heading search failed.
    #[error(transparent)]
    Optimize(#[from] fieldpath_optimize::OptimizeError),

    /// Logistics planning failed.
    #[error(transparent)]
    Logistics(#[from] fieldpath_logistics::LogisticsError),

    /// Planner configuration outside its valid ranges.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;
