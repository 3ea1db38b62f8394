//! Events that trigger pass state transitions

use super::machine::StopReason;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassEvent {
    /// Travelled distance crossed the width threshold
    WorkZoneEntered,
    /// Drive halted by a trip condition or the travel guard
    EndOfTravel(StopReason),
    /// Stop actions completed; decide what comes next
    PassEnded,
    /// Run the mirrored pass in the opposite direction
    Reverse,
    /// No further passes
    Finish,
}
