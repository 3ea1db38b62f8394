//! Closed-loop control building blocks
//!
//! - [`pid`]: the PID primitive
//! - [`regulator`]: rate-limited wheel velocity regulation
//! - [`odometry`]: travelled distance from the wheel encoders
//! - [`sequencer`]: distance-gated valve and brush sequencing

pub mod odometry;
pub mod pid;
pub mod regulator;
pub mod sequencer;

pub use pid::Pid;
pub use regulator::{DriveCommand, VelocityRegulator};
pub use sequencer::{ActuatorSequencer, ActuatorState};
