//! Sensor driver implementations

pub mod endstop;
pub mod proximity;

pub use endstop::Endstop;
pub use proximity::{ProximityPolarity, ProximitySwitch};
