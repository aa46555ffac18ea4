#![warn(missing_docs)]

//! Ground-vehicle rendezvous and resource-bounded mission segmentation.
//!
//! The aircraft burns liquid while spraying and airtime always; the ground
//! vehicle resupplies it at rendezvous points on a shared track (the field
//! perimeter, an outward-buffered ring, or an operator-drawn route). This
//! crate computes those rendezvous and cuts a continuous coverage path into
//! mission cycles the aircraft can actually fly on one tank and one battery.

pub mod error;
pub mod operation;
pub mod segmenter;
pub mod station;

pub use error::{LogisticsError, Result};
pub use operation::DroneOperation;
pub use segmenter::{CycleSegment, MissionCycle, MissionSegmenter};
pub use station::{MobileStation, Rendezvous, SupportTrack};
