//! Controller configuration and validation

use crate::state::PassDirection;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default wheel velocity set-point (m/s)
pub const DEFAULT_TARGET_VELOCITY: f32 = 0.14;

/// Default regulator cadence (ms)
pub const DEFAULT_CONTROL_INTERVAL_MS: u32 = 50;

/// Default end of the working zone (mm)
pub const DEFAULT_DISTANCE_THRESHOLD_MM: f32 = 1947.6;

/// Default start of the working zone (mm), half the robot width
pub const DEFAULT_WIDTH_THRESHOLD_MM: f32 = 200.0;

/// PID gains
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PidGains {
    /// Proportional gain (Kp)
    pub kp: f32,
    /// Integral gain (Ki)
    pub ki: f32,
    /// Derivative gain (Kd)
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

impl Default for PidGains {
    fn default() -> Self {
        Self::new(2.0, 0.1, 0.1)
    }
}

/// Configuration errors detected before the controller starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width threshold is not below the distance threshold
    ThresholdOrder,
    /// A threshold is negative, NaN or infinite
    InvalidThreshold,
    /// Output bounds are empty or not finite
    OutputRange,
    /// A PID gain is negative or not finite
    InvalidGain,
    /// Target velocity is not a positive finite number
    TargetVelocity,
    /// Regulator cadence is zero
    ControlInterval,
    /// Travel guard does not cover the working zone
    TravelGuard,
    /// Brush speed outside 0.0..=1.0
    BrushSpeed,
}

/// Pass controller configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Wheel velocity set-point shared by both wheels (m/s)
    pub target_velocity: f32,
    /// PID gains, identical for both wheels
    pub gains: PidGains,
    /// Lower bound of the drive command
    pub min_output: f32,
    /// Upper bound of the drive command
    pub max_output: f32,
    /// Clamp the integral contribution to the output bounds
    pub anti_windup: bool,
    /// Minimum time between regulator updates (ms)
    pub control_interval_ms: u32,
    /// Distance at which valve and brush turn on (mm)
    pub width_threshold_mm: f32,
    /// Distance after which valve and brush turn off (mm)
    pub distance_threshold_mm: f32,
    /// Brush speed inside the working zone (0.0..=1.0)
    pub brush_speed: f32,
    /// Reverse and run the return pass after the first one
    pub bidirectional: bool,
    /// Direction of the first pass
    pub initial_direction: PassDirection,
    /// Right drive motor is mounted mirrored to the left one
    pub mirror_right_motor: bool,
    /// Check both proximity sensors every tick, not only the pass side
    pub check_both_sides: bool,
    /// Clear PID integral and derivative history at every pass entry
    pub reset_pid_between_passes: bool,
    /// Pass is aborted as a fault beyond this distance (mm)
    pub max_pass_distance_mm: f32,
    /// Pass is aborted as a fault after this long (ms)
    pub max_pass_duration_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_velocity: DEFAULT_TARGET_VELOCITY,
            gains: PidGains::default(),
            min_output: 0.0,
            max_output: 1.0,
            anti_windup: true,
            control_interval_ms: DEFAULT_CONTROL_INTERVAL_MS,
            width_threshold_mm: DEFAULT_WIDTH_THRESHOLD_MM,
            distance_threshold_mm: DEFAULT_DISTANCE_THRESHOLD_MM,
            brush_speed: 1.0,
            bidirectional: true,
            initial_direction: PassDirection::Forward,
            mirror_right_motor: true,
            check_both_sides: true,
            reset_pid_between_passes: false,
            max_pass_distance_mm: 2500.0,
            max_pass_duration_ms: 60_000,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration for inconsistencies
    ///
    /// Returns the first problem found. The controller refuses to start
    /// with a configuration that fails this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            self.width_threshold_mm,
            self.distance_threshold_mm,
            self.max_pass_distance_mm,
        ];
        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(ConfigError::InvalidThreshold);
        }

        if self.width_threshold_mm >= self.distance_threshold_mm {
            return Err(ConfigError::ThresholdOrder);
        }

        if !self.min_output.is_finite()
            || !self.max_output.is_finite()
            || self.min_output >= self.max_output
        {
            return Err(ConfigError::OutputRange);
        }

        let gains = [self.gains.kp, self.gains.ki, self.gains.kd];
        if gains.iter().any(|g| !g.is_finite() || *g < 0.0) {
            return Err(ConfigError::InvalidGain);
        }

        if !self.target_velocity.is_finite() || self.target_velocity <= 0.0 {
            return Err(ConfigError::TargetVelocity);
        }

        if self.control_interval_ms == 0 {
            return Err(ConfigError::ControlInterval);
        }

        if self.max_pass_distance_mm <= self.distance_threshold_mm
            || self.max_pass_duration_ms == 0
        {
            return Err(ConfigError::TravelGuard);
        }

        if !(0.0..=1.0).contains(&self.brush_speed) {
            return Err(ConfigError::BrushSpeed);
        }

        Ok(())
    }
}
