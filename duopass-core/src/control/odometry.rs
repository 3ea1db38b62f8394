//! Travelled distance from the two wheel encoders
//!
//! Distance is derived, never stored: it is the mean of the two wheel
//! distance counters and must be re-read every tick.

use crate::traits::WheelEncoder;

/// Distance travelled since the last reset (mm)
pub fn traveled<E: WheelEncoder>(left: &mut E, right: &mut E) -> f32 {
    (left.distance() + right.distance()) / 2.0
}

/// Zero both distance accumulators
pub fn reset<E: WheelEncoder>(left: &mut E, right: &mut E) {
    left.reset_distance();
    right.reset_distance();
}
