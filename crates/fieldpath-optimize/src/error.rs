//! Error types for the heading search.

use thiserror::Error;

/// Errors that can occur while configuring or running the optimizer.
#[derive(Error, Debug)]
pub enum OptimizeError {
    /// Settings outside their valid ranges.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// No heading produced a usable coverage path.
    ///
    /// Every grid angle swept to an empty path; the field is too small for
    /// the swath, or the margin consumed it.
    #[error("no heading yields a non-empty coverage path")]
    NoViableHeading,
}

/// Result type for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizeError>;
