#![warn(missing_docs)]

//! 2D field geometry for the fieldpath mission planner.
//!
//! This crate provides the polygon and polyline primitives the planner is
//! built on, plus the two boundary operations that prepare a field for
//! coverage planning: concavity-aware decomposition into heading-safe
//! sub-fields and analytic inward offsetting for safety margins.
//!
//! All geometry is planar `f64`; altitude is dropped at the crate boundary.
//!
//! # Example
//!
//! ```
//! use fieldpath_geom::{Point2, Polygon};
//!
//! let field = Polygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(100.0, 0.0),
//!     Point2::new(100.0, 100.0),
//!     Point2::new(0.0, 100.0),
//! ])
//! .unwrap();
//!
//! assert!((field.area() - 10_000.0).abs() < 1e-9);
//! ```

pub mod decompose;
pub mod error;
pub mod margin;
pub mod polygon;
pub mod polyline;

pub use decompose::{decompose, DecomposeSettings};
pub use error::{GeomError, Result};
pub use margin::{expand, shrink};
pub use polygon::Polygon;
pub use polyline::Polyline;

/// A point in the local planar frame (meters).
pub type Point2 = nalgebra::Point2<f64>;

/// A 2D vector in the local planar frame.
pub type Vec2 = nalgebra::Vector2<f64>;

/// Tolerance for coordinate comparisons (meters).
pub const EPS: f64 = 1e-9;
