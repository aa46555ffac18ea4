//! Error types for mission logistics.

use thiserror::Error;

/// Errors that can occur while planning logistics.
#[derive(Error, Debug)]
pub enum LogisticsError {
    /// The rendezvous track has no extent; no arc-length math is possible.
    #[error("rendezvous track has zero length")]
    ZeroLengthTrack,

    /// Operational parameters outside their valid ranges.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The demanded application rate exceeds what the pump can deliver.
    #[error("pump overload: required {required:.1} L/min exceeds maximum {maximum:.1} L/min")]
    PumpOverload {
        /// Flow the rate/speed/swath combination demands (L/min).
        required: f64,
        /// Pump limit (L/min).
        maximum: f64,
    },

    /// A coverage path with fewer than two waypoints cannot be segmented.
    #[error("coverage path has fewer than two waypoints")]
    EmptyPath,

    /// A single path segment exceeds a fresh cycle's full budget.
    ///
    /// Re-cutting would loop forever; the configuration (tank, endurance,
    /// speed, rate) cannot fly this path.
    #[error(
        "segment {segment} alone exceeds a fresh cycle budget \
         (needs {needed_time:.0} s of {endurance:.0} s endurance, \
         {needed_liquid:.1} L of {tank:.1} L tank)"
    )]
    ResourceInfeasible {
        /// Index of the offending segment in the input path.
        segment: usize,
        /// Predicted airtime for the segment plus escape and safety buffer.
        needed_time: f64,
        /// Configured endurance (s).
        endurance: f64,
        /// Liquid the segment demands (L).
        needed_liquid: f64,
        /// Configured tank capacity (L).
        tank: f64,
    },
}

/// Result type for logistics operations.
pub type Result<T> = std::result::Result<T, LogisticsError>;
