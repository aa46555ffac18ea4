//! Error types for field geometry.

use thiserror::Error;

/// Errors that can occur while constructing or transforming field geometry.
#[derive(Error, Debug)]
pub enum GeomError {
    /// Not enough vertices to form the requested shape.
    #[error("insufficient points: expected at least {expected}, got {actual}")]
    InsufficientPoints {
        /// Minimum vertex count for the operation.
        expected: usize,
        /// Vertex count actually supplied.
        actual: usize,
    },

    /// The boundary crosses itself.
    #[error("polygon boundary is self-intersecting near vertex {vertex}")]
    SelfIntersecting {
        /// Index of the first vertex of an offending edge.
        vertex: usize,
    },

    /// A polyline with no extent was supplied where arc length is required.
    #[error("polyline has zero length")]
    ZeroLength,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
