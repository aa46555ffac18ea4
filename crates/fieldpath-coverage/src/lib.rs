#![warn(missing_docs)]

//! Boustrophedon coverage paths and ground-route costs.
//!
//! This crate turns a heading-safe sub-field into a zig-zag spray path and
//! prices the ground-vehicle travel that links the paths of neighboring
//! sub-fields along the field perimeter. Both are pure geometry: the genetic
//! optimizer calls them for every candidate heading.

pub mod route;
pub mod sweep;

pub use route::{anchor_cost, linking_cost, ring_distance};
pub use sweep::{sweep_polygon, CoveragePath, SweepSettings};
