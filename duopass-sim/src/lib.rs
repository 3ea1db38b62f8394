//! Host simulator for the duopass pass controller
//!
//! Runs the board-agnostic controller against a simulated robot on a
//! straight track between two end stops:
//!
//! - [`plant`]: wheels with first-order motor lag, end stops, proximity
//!   sensors, valves and brush sharing one simulated world
//! - [`config`]: TOML configuration for the controller, plant and run
//! - [`runner`]: the tick loop and the run report
//! - [`sink`]: diagnostics routed to `tracing`

pub mod config;
pub mod error;
pub mod plant;
pub mod runner;
pub mod sink;

pub use config::SimConfig;
pub use error::SimError;
pub use runner::{SimReport, Simulation};
