//! Pass state machine
//!
//! Defines the authoritative runtime behavior of a traversal.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::PassEvent;
pub use machine::{PassDirection, PassState, StopReason};
