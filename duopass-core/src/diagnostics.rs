//! Operator diagnostics
//!
//! The controller reports through a [`DiagnosticSink`]. Delivery is fire
//! and forget; a sink may drop messages.

use core::fmt;

use crate::pass::PassSummary;
use crate::state::PassDirection;
use crate::traits::MotorError;

/// Which motor a driver error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorRole {
    LeftDrive,
    RightDrive,
    Brush,
}

impl MotorRole {
    fn name(self) -> &'static str {
        match self {
            MotorRole::LeftDrive => "left drive",
            MotorRole::RightDrive => "right drive",
            MotorRole::Brush => "brush",
        }
    }
}

/// Diagnostic emitted by the pass controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Proximity sensor reports it is not working; motion suppressed
    SensorFault(PassDirection),
    /// Previously faulted proximity sensor is healthy again
    SensorRecovered(PassDirection),
    /// A pass began
    PassStarted(PassDirection),
    /// A pass ended at a trip condition or the travel guard
    PassComplete(PassSummary),
    /// A pass exceeded the travel guard
    TravelLimitExceeded(PassSummary),
    /// A motor driver rejected a command
    MotorFault(MotorRole, MotorError),
    /// No further passes will run
    Shutdown,
}

impl Diagnostic {
    /// Check if this diagnostic needs operator attention
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Diagnostic::SensorFault(_)
                | Diagnostic::TravelLimitExceeded(_)
                | Diagnostic::MotorFault(..)
        )
    }
}

fn direction_name(direction: PassDirection) -> &'static str {
    match direction {
        PassDirection::Forward => "forward",
        PassDirection::Backward => "backward",
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SensorFault(side) => write!(
                f,
                "Warning: Proximity sensor {} is not working. System remains stopped",
                side.side_number()
            ),
            Diagnostic::SensorRecovered(side) => write!(
                f,
                "Proximity sensor {} is working again. Resuming",
                side.side_number()
            ),
            Diagnostic::PassStarted(direction) => {
                write!(f, "Starting {} pass", direction_name(*direction))
            }
            Diagnostic::PassComplete(summary) => write!(
                f,
                "{} pass stopped by {} after {:.1} mm in {} ms",
                direction_name(summary.direction),
                summary.reason_name(),
                summary.distance_mm,
                summary.duration_ms
            ),
            Diagnostic::TravelLimitExceeded(summary) => write!(
                f,
                "Fault: {} pass exceeded travel limit at {:.1} mm after {} ms. Drive stopped",
                direction_name(summary.direction),
                summary.distance_mm,
                summary.duration_ms
            ),
            Diagnostic::MotorFault(role, error) => {
                write!(f, "Warning: {} motor error: {:?}", role.name(), error)
            }
            Diagnostic::Shutdown => f.write_str("System shutting down."),
        }
    }
}

/// Destination for diagnostics
pub trait DiagnosticSink {
    /// Emit a diagnostic
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Sink that logs through defmt
#[cfg(feature = "defmt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefmtSink;

#[cfg(feature = "defmt")]
impl DiagnosticSink for DefmtSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            defmt::warn!("{}", defmt::Display2Format(&diagnostic));
        } else {
            defmt::info!("{}", defmt::Display2Format(&diagnostic));
        }
    }
}
