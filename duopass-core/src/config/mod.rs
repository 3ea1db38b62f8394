//! Configuration types
//!
//! Board-agnostic controller configuration. Values are fixed at
//! initialization; nothing here is reloaded while a pass is running.

pub mod controller;

pub use controller::*;
