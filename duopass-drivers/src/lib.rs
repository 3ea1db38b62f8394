//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in duopass-core on top of `embedded-hal` 1.0:
//!
//! - Motor drivers (dual-PWM H-bridge, used for drive wheels and brush)
//! - Solenoid valves
//! - Limit switches and proximity sensors with a ready line
//! - Interrupt-fed pulse encoders
//! - Serial diagnostic output

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod encoder;
pub mod motor;
pub mod sensor;
pub mod serial;
pub mod valve;
