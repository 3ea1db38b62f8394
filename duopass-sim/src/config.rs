//! Simulator configuration
//!
//! Loaded from a TOML file. Every table and field is optional; missing
//! values fall back to the reference robot.
//!
//! ```toml
//! [controller]
//! target_velocity = 0.14
//! bidirectional = true
//!
//! [controller.gains]
//! kp = 2.0
//!
//! [plant]
//! track_length_mm = 2000.0
//!
//! [run]
//! tick_ms = 10
//!
//! [[run.sensor_faults]]
//! side = "Backward"
//! from_ms = 3000
//! until_ms = 3500
//! ```

use std::fs;
use std::path::Path;

use duopass_core::config::ControllerConfig;
use duopass_core::state::PassDirection;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Complete simulator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub controller: ControllerConfig,
    pub plant: PlantConfig,
    pub run: RunConfig,
}

/// Physical parameters of the simulated robot and track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Distance between the two end stops (mm)
    pub track_length_mm: f32,
    /// Robot position at start, measured from the backward end stop (mm)
    pub start_position_mm: f32,
    /// Wheel surface speed at full duty (m/s)
    pub max_wheel_speed: f32,
    /// Motor time constant (ms)
    pub motor_time_constant_ms: f32,
    /// Right wheel speed relative to the left at equal duty
    pub right_wheel_gain: f32,
    /// Proximity sensors trip when the gap to the end stop is below this (mm)
    pub proximity_range_mm: f32,
    /// Encoder edges per wheel revolution
    pub pulses_per_rev: u32,
    /// Wheel circumference (mm)
    pub wheel_circumference_mm: f32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            track_length_mm: 2000.0,
            start_position_mm: 0.0,
            max_wheel_speed: 0.5,
            motor_time_constant_ms: 150.0,
            right_wheel_gain: 1.0,
            proximity_range_mm: 0.0,
            pulses_per_rev: 360,
            wheel_circumference_mm: 204.2,
        }
    }
}

impl PlantConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.track_length_mm.is_finite() && self.track_length_mm > 0.0) {
            return Err(SimError::Plant("track_length_mm must be positive"));
        }
        if !(0.0..=self.track_length_mm).contains(&self.start_position_mm) {
            return Err(SimError::Plant("start_position_mm must lie on the track"));
        }
        if !(self.max_wheel_speed.is_finite() && self.max_wheel_speed > 0.0) {
            return Err(SimError::Plant("max_wheel_speed must be positive"));
        }
        if !(self.motor_time_constant_ms.is_finite() && self.motor_time_constant_ms >= 0.0) {
            return Err(SimError::Plant("motor_time_constant_ms must not be negative"));
        }
        if !(self.right_wheel_gain.is_finite() && self.right_wheel_gain > 0.0) {
            return Err(SimError::Plant("right_wheel_gain must be positive"));
        }
        if self.pulses_per_rev == 0 {
            return Err(SimError::Plant("pulses_per_rev must be non-zero"));
        }
        if !(self.wheel_circumference_mm.is_finite() && self.wheel_circumference_mm > 0.0) {
            return Err(SimError::Plant("wheel_circumference_mm must be positive"));
        }
        Ok(())
    }
}

/// Window during which a proximity sensor reports a fault
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorFault {
    pub side: PassDirection,
    pub from_ms: u32,
    pub until_ms: u32,
}

impl SensorFault {
    /// Check if the fault is active at `now_ms`
    pub fn active_at(&self, now_ms: u32) -> bool {
        now_ms >= self.from_ms && now_ms < self.until_ms
    }
}

/// Run control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Simulation step (ms)
    pub tick_ms: u32,
    /// Stop after this much simulated time even if the controller is busy (ms)
    pub max_duration_ms: u32,
    pub sensor_faults: Vec<SensorFault>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            max_duration_ms: 120_000,
            sensor_faults: Vec::new(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_ms == 0 {
            return Err(SimError::Run("tick_ms must be non-zero"));
        }
        if self.max_duration_ms < self.tick_ms {
            return Err(SimError::Run("max_duration_ms must cover at least one tick"));
        }
        if self.sensor_faults.iter().any(|f| f.until_ms <= f.from_ms) {
            return Err(SimError::Run("sensor fault windows must end after they start"));
        }
        Ok(())
    }
}

impl SimConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, SimError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.controller.validate()?;
        self.plant.validate()?;
        self.run.validate()
    }
}
