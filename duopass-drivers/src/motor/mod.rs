//! Motor driver implementations
//!
//! Drive wheels and the brush use the same dual-PWM H-bridge driver.

pub mod hbridge;

pub use hbridge::{HBridgeConfig, HBridgeMotor};
