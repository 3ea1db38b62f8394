//! Wheel velocity regulation
//!
//! Two independent PID loops drive both wheels to the same set-point.
//! Updates are rate-limited so the control rate does not depend on how
//! often the pass controller ticks.

use super::pid::Pid;
use crate::config::ControllerConfig;

/// Drive command for both wheels, in the regulator's output range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    pub left: f32,
    pub right: f32,
}

impl DriveCommand {
    /// Both wheels stopped
    pub const STOPPED: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Check if both wheels are commanded to zero
    pub fn is_stopped(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

/// Velocity regulator for the two drive wheels
#[derive(Debug, Clone)]
pub struct VelocityRegulator {
    left: Pid,
    right: Pid,
    /// Minimum time between updates (ms)
    interval_ms: u32,
    /// Timestamp of the last update, None until the first poll
    last_update_ms: Option<u32>,
    /// Last computed command
    last_command: DriveCommand,
}

impl VelocityRegulator {
    /// Create a regulator from the controller configuration
    pub fn new(config: &ControllerConfig) -> Self {
        let pid = Pid::new(
            config.gains,
            config.min_output,
            config.max_output,
            config.anti_windup,
        );
        Self {
            left: pid.clone(),
            right: pid,
            interval_ms: config.control_interval_ms,
            last_update_ms: None,
            last_command: DriveCommand::STOPPED,
        }
    }

    /// Check the cadence
    ///
    /// Returns the elapsed time in seconds when an update is due, and
    /// records `now_ms` as the new reference. The first call only records
    /// the reference.
    pub fn poll(&mut self, now_ms: u32) -> Option<f32> {
        let Some(last) = self.last_update_ms else {
            self.last_update_ms = Some(now_ms);
            return None;
        };

        let elapsed = now_ms.wrapping_sub(last);
        if elapsed > self.interval_ms {
            self.last_update_ms = Some(now_ms);
            Some(elapsed as f32 / 1000.0)
        } else {
            None
        }
    }

    /// Make `now_ms` the reference for the next cadence check
    ///
    /// The next update is due one full interval later.
    pub fn restart(&mut self, now_ms: u32) {
        self.last_update_ms = Some(now_ms);
    }

    /// Compute a new drive command
    pub fn update(
        &mut self,
        target: f32,
        measured_left: f32,
        measured_right: f32,
        dt: f32,
    ) -> DriveCommand {
        let command = DriveCommand {
            left: self.left.calculate(target, measured_left, dt),
            right: self.right.calculate(target, measured_right, dt),
        };
        self.last_command = command;
        command
    }

    /// Get the last computed command
    pub fn last_command(&self) -> DriveCommand {
        self.last_command
    }

    /// Get the left wheel controller
    pub fn left(&self) -> &Pid {
        &self.left
    }

    /// Get the right wheel controller
    pub fn right(&self) -> &Pid {
        &self.right
    }

    /// Clear both PID histories and the last command
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.last_command = DriveCommand::STOPPED;
    }
}
