//! Safety interlock
//!
//! Gates motion on proximity sensor health.

pub mod interlock;

pub use interlock::{SafetyInterlock, SafetyStatus};
