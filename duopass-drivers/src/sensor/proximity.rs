//! Proximity sensor with a health output
//!
//! Industrial proximity switches expose a detection output and a separate
//! ready (or stability) output. The sensor is healthy only while the ready
//! line is asserted and both lines read without error.

use duopass_core::traits::{ProximityReading, ProximitySensor};
use embedded_hal::digital::InputPin;

/// Pin polarity for a [`ProximitySwitch`]
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProximityPolarity {
    /// Detection output level when an object is present
    pub detect_high: bool,
    /// Ready output level when the sensor is working
    pub ready_high: bool,
}

impl Default for ProximityPolarity {
    fn default() -> Self {
        Self {
            detect_high: true,
            ready_high: true,
        }
    }
}

/// Proximity switch with detection and ready lines
pub struct ProximitySwitch<S, R> {
    detect: S,
    ready: R,
    polarity: ProximityPolarity,
}

impl<S: InputPin, R: InputPin> ProximitySwitch<S, R> {
    pub fn new(detect: S, ready: R, polarity: ProximityPolarity) -> Self {
        Self {
            detect,
            ready,
            polarity,
        }
    }

    /// Release the detection and ready pins
    pub fn release(self) -> (S, R) {
        (self.detect, self.ready)
    }
}

impl<S: InputPin, R: InputPin> ProximitySensor for ProximitySwitch<S, R> {
    fn read(&mut self) -> ProximityReading {
        match self.ready.is_high() {
            Ok(level) if level == self.polarity.ready_high => {}
            _ => return ProximityReading::Fault,
        }

        match self.detect.is_high() {
            Ok(level) if level == self.polarity.detect_high => ProximityReading::Tripped,
            Ok(_) => ProximityReading::Clear,
            Err(_) => ProximityReading::Fault,
        }
    }
}
