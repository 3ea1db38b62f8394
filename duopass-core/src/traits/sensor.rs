//! Sensor traits: end-of-travel sensing and wheel odometry

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reading from a proximity sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProximityReading {
    /// Sensor healthy, nothing detected
    Clear,
    /// Sensor healthy, obstruction or end of travel detected
    Tripped,
    /// Sensor reports it is not working
    Fault,
}

impl ProximityReading {
    /// Check if the sensor is working
    pub fn is_healthy(self) -> bool {
        !matches!(self, ProximityReading::Fault)
    }

    /// Check if the sensor reports a trip condition
    pub fn is_tripped(self) -> bool {
        matches!(self, ProximityReading::Tripped)
    }
}

/// Trait for an end-of-travel limit switch
pub trait LimitSwitch {
    /// Check if the switch is triggered
    fn is_triggered(&mut self) -> bool;
}

/// Trait for a proximity sensor with health reporting
///
/// Takes `&mut self` because pin reads typically require mutable access.
pub trait ProximitySensor {
    /// Read the sensor state
    fn read(&mut self) -> ProximityReading;
}

/// Trait for a wheel encoder
///
/// The encoder keeps two independent accumulators: a short velocity window
/// and a distance counter. The velocity window is restarted after every
/// regulator update; the distance counter only at pass boundaries.
pub trait WheelEncoder {
    /// Wheel surface velocity in m/s
    fn velocity(&mut self) -> f32;

    /// Distance travelled since the last distance reset, in mm
    ///
    /// Monotonic between resets regardless of rotation direction.
    fn distance(&mut self) -> f32;

    /// Restart the velocity measurement window
    fn reset_velocity(&mut self);

    /// Zero the distance accumulator
    fn reset_distance(&mut self);
}
