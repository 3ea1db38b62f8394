//! Pass controller
//!
//! Orchestrates one traversal per direction: safety interlock, velocity
//! regulation, distance-gated actuators, end-of-travel detection, and the
//! decision to run the mirrored return pass.

pub mod controller;
pub mod hardware;

pub use controller::{PassController, PassSummary, TickOutcome, MAX_PASSES};
pub use hardware::{Drivetrain, PassHardware, PassSide};
