//! Motor driver traits
//!
//! This module defines traits for the two motor roles on the robot:
//! - Drive motors (one per wheel, speed regulated by the controller)
//! - The brush motor (open-loop on/off)
//!
//! Speeds are normalized to `0.0..=1.0` of full power.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Errors that can occur with motor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// PWM channel rejected the duty cycle
    Pwm,
    /// Speed was NaN or infinite
    InvalidSpeed,
}

/// Trait for a wheel drive motor
pub trait DriveMotor {
    /// Set the output speed as a fraction of full power
    ///
    /// Values outside `0.0..=1.0` are clamped by the implementation.
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError>;

    /// Set the rotation direction
    fn set_direction(&mut self, dir: Direction) -> Result<(), MotorError>;

    /// Stop the motor (speed forced to zero)
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Get the last commanded speed
    fn speed(&self) -> f32;

    /// Get the current direction
    fn direction(&self) -> Direction;
}

/// Trait for the scrubbing brush motor
///
/// The brush runs open-loop, so only speed and stop are needed.
pub trait BrushMotor {
    /// Set the output speed as a fraction of full power
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError>;

    /// Stop the brush
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Get the last commanded speed
    fn speed(&self) -> f32;
}
