//! Planner configuration.

use fieldpath_geom::Point2;
use fieldpath_logistics::DroneOperation;
use serde::{Deserialize, Serialize};

use crate::strategy::PlannerStrategy;

/// Where the ground vehicle may drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupportConfig {
    /// Drive the field perimeter, pushed outward by `offset` meters.
    FieldPerimeter {
        /// Outward standoff from the boundary (m); 0 drives the boundary.
        offset: f64,
    },
    /// Drive an operator-drawn open route.
    Route {
        /// Route points in drive order.
        points: Vec<Point2>,
    },
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self::FieldPerimeter { offset: 0.0 }
    }
}

/// Everything the planner needs besides the boundary itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Aircraft operating envelope.
    pub operation: DroneOperation,
    /// Inward safety margin applied to the boundary before planning (m).
    ///
    /// Derived externally, typically max(half physical width, half swath)
    /// plus a positioning buffer.
    pub safety_margin: f64,
    /// Ground-vehicle speed (m/s); below 0.1 the vehicle is parked.
    pub vehicle_speed: f64,
    /// Ground-vehicle track.
    pub support: SupportConfig,
    /// Heading-search strategy.
    pub strategy: PlannerStrategy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            operation: DroneOperation::default(),
            safety_margin: 0.0,
            vehicle_speed: 5.0,
            support: SupportConfig::default(),
            strategy: PlannerStrategy::default(),
        }
    }
}

impl PlannerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if self.safety_margin < 0.0 || !self.safety_margin.is_finite() {
            return Err(crate::PlanError::InvalidConfig(
                "safety_margin must be non-negative".into(),
            ));
        }
        if self.vehicle_speed < 0.0 || !self.vehicle_speed.is_finite() {
            return Err(crate::PlanError::InvalidConfig(
                "vehicle_speed must be non-negative".into(),
            ));
        }
        if let SupportConfig::Route { points } = &self.support {
            if points.len() < 2 {
                return Err(crate::PlanError::InvalidConfig(
                    "support route needs at least two points".into(),
                ));
            }
        }
        self.operation.validate()?;
        if let PlannerStrategy::Genetic(settings) = &self.strategy {
            settings.validate()?;
        }
        Ok(())
    }
}
