#![warn(missing_docs)]

//! Aerial-coverage mission planning for agricultural fields.
//!
//! Given a field boundary and an aircraft's operating envelope, this crate
//! produces a sweep path covering the field and a ground-vehicle logistics
//! plan that resupplies the aircraft mid-mission:
//!
//! 1. shrink the boundary by the safety margin,
//! 2. search sweep headings (genetic or a quick axis-aligned pass),
//! 3. cut the winning path into tank- and battery-bounded mission cycles
//!    with rendezvous points on the vehicle's track.
//!
//! # Example
//!
//! ```ignore
//! use fieldpath::{MissionPlanner, PlannerConfig, Point2};
//!
//! let planner = MissionPlanner::new(PlannerConfig::default())?;
//! let plan = planner.plan(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(100.0, 0.0),
//!     Point2::new(100.0, 100.0),
//!     Point2::new(0.0, 100.0),
//! ])?;
//! println!("{} cycles at {:.1}°", plan.cycles.len(), plan.heading_deg);
//! ```

pub mod config;
pub mod error;
pub mod plan;
pub mod planner;
pub mod strategy;

pub use config::{PlannerConfig, SupportConfig};
pub use error::{PlanError, Result};
pub use plan::{MissionPlan, PlanTotals};
pub use planner::MissionPlanner;
pub use strategy::PlannerStrategy;

pub use fieldpath_coverage::{CoveragePath, SweepSettings};
pub use fieldpath_geom::{DecomposeSettings, Point2, Polygon, Polyline};
pub use fieldpath_logistics::{
    CycleSegment, DroneOperation, MissionCycle, MobileStation, Rendezvous, SupportTrack,
};
pub use fieldpath_optimize::{FitnessWeights, GaSettings, SearchResult};
