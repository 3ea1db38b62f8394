//! Board-agnostic core logic for the duopass cleaning robot
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (drive/brush motors, valves, sensors, encoders)
//! - Controller configuration and validation
//! - Wheel velocity regulation (PID)
//! - Distance tracking and distance-gated actuator sequencing
//! - Safety interlock on proximity sensor health
//! - The pass state machine and the per-tick pass controller

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod diagnostics;
pub mod pass;
pub mod safety;
pub mod state;
pub mod traits;
