//! State machine definition
//!
//! Drive, brush, and valve behavior is a function of the current state,
//! the pass direction, and the distance travelled.

use super::events::PassEvent;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Travel direction of a pass
///
/// Each direction owns one side's limit switch, proximity sensor, and valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PassDirection {
    #[default]
    Forward,
    Backward,
}

impl PassDirection {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            PassDirection::Forward => PassDirection::Backward,
            PassDirection::Backward => PassDirection::Forward,
        }
    }

    /// One-based index of the sensor/valve side used by this direction
    pub fn side_number(self) -> u8 {
        match self {
            PassDirection::Forward => 1,
            PassDirection::Backward => 2,
        }
    }
}

/// Why a pass stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// Pass-side limit switch triggered
    LimitSwitch,
    /// Pass-side proximity sensor tripped
    Proximity,
    /// Travel guard exceeded (distance or duration)
    TravelLimit,
}

impl StopReason {
    /// Check if this stop is a fault rather than a normal end of travel
    pub fn is_fault(self) -> bool {
        matches!(self, StopReason::TravelLimit)
    }
}

/// Pass states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassState {
    /// Driving toward the working zone, actuators off
    Approaching,
    /// Working zone reached at least once during this pass
    Working,
    /// Drive halted at end of travel
    Stopped(StopReason),
    /// Deciding whether to run the return pass
    ReverseCheck,
    /// Terminal; no further motor commands
    Idle,
}

impl PassState {
    /// Check if this state allows the drive motors to run
    pub fn motion_allowed(&self) -> bool {
        matches!(self, PassState::Approaching | PassState::Working)
    }

    /// Check if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, PassState::Idle)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PassEvent) -> Self {
        use PassEvent::*;
        use PassState::*;

        match (self, event) {
            (Approaching, WorkZoneEntered) => Working,

            (Approaching, EndOfTravel(reason)) => Stopped(reason),
            (Working, EndOfTravel(reason)) => Stopped(reason),

            (Stopped(_), PassEnded) => ReverseCheck,

            (ReverseCheck, Reverse) => Approaching,
            (ReverseCheck, Finish) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
