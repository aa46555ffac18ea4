//! Typed operational parameters for one aircraft.

use serde::{Deserialize, Serialize};

use crate::error::{LogisticsError, Result};

/// Operating envelope of the spraying aircraft.
///
/// Everything the segmenter needs, as explicit fields; there is no global
/// spec registry behind this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DroneOperation {
    /// Working speed (m/s).
    pub work_speed: f64,
    /// Tank capacity (L).
    pub tank_capacity: f64,
    /// Maximum pump flow (L/min).
    pub max_pump_flow: f64,
    /// Worst-case endurance on a full battery (s).
    pub endurance: f64,
    /// Effective spray swath (m).
    pub swath_width: f64,
    /// Target application rate (L/ha).
    pub application_rate: f64,
}

impl Default for DroneOperation {
    fn default() -> Self {
        Self {
            work_speed: 5.0,
            tank_capacity: 40.0,
            max_pump_flow: 16.0,
            endurance: 15.0 * 60.0,
            swath_width: 5.0,
            application_rate: 20.0,
        }
    }
}

impl DroneOperation {
    /// Validate the envelope, including the pump against the demanded rate.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("work_speed", self.work_speed),
            ("tank_capacity", self.tank_capacity),
            ("max_pump_flow", self.max_pump_flow),
            ("endurance", self.endurance),
            ("swath_width", self.swath_width),
            ("application_rate", self.application_rate),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(LogisticsError::InvalidOperation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let required = self.required_pump_flow();
        if required > self.max_pump_flow {
            return Err(LogisticsError::PumpOverload {
                required,
                maximum: self.max_pump_flow,
            });
        }
        Ok(())
    }

    /// Pump flow the rate/speed/swath combination demands (L/min).
    pub fn required_pump_flow(&self) -> f64 {
        let speed_kmh = self.work_speed * 3.6;
        self.application_rate * speed_kmh * self.swath_width / 600.0
    }

    /// Liquid burned per meter of spraying flight (L/m).
    pub fn liters_per_meter(&self) -> f64 {
        self.application_rate * self.swath_width / 10_000.0
    }
}
