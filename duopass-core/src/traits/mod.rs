//! Hardware abstraction traits
//!
//! These traits define the interface between the pass controller
//! and hardware-specific implementations.

pub mod actuator;
pub mod motor;
pub mod sensor;

pub use actuator::Valve;
pub use motor::{BrushMotor, Direction, DriveMotor, MotorError};
pub use sensor::{LimitSwitch, ProximityReading, ProximitySensor, WheelEncoder};
