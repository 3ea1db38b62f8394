//! Distance-gated actuator sequencing
//!
//! Valve and brush are on exactly while the travelled distance is inside
//! the working zone `(width_threshold, distance_threshold]`. There is no
//! hysteresis band; distance is monotonic within a pass.

use crate::config::ControllerConfig;
use crate::traits::{BrushMotor, MotorError, Valve};

/// Actuator phase within a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorState {
    /// Approach zone, valve and brush off
    #[default]
    Idle,
    /// Working zone entered on this evaluation, valve and brush switched on
    Wetting,
    /// Inside the working zone, valve and brush on
    Scrubbing,
    /// Past the distance threshold, valve and brush off
    Finishing,
}

impl ActuatorState {
    /// Check if valve and brush are on in this state
    pub fn actuators_on(&self) -> bool {
        matches!(self, ActuatorState::Wetting | ActuatorState::Scrubbing)
    }
}

/// Sequencer mapping distance to valve/brush commands
#[derive(Debug, Clone)]
pub struct ActuatorSequencer {
    width_threshold_mm: f32,
    distance_threshold_mm: f32,
    brush_speed: f32,
    state: ActuatorState,
}

impl ActuatorSequencer {
    /// Create a sequencer from the controller configuration
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            width_threshold_mm: config.width_threshold_mm,
            distance_threshold_mm: config.distance_threshold_mm,
            brush_speed: config.brush_speed,
            state: ActuatorState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Check if `distance_mm` is inside the working zone
    pub fn in_work_zone(&self, distance_mm: f32) -> bool {
        distance_mm > self.width_threshold_mm && distance_mm <= self.distance_threshold_mm
    }

    /// Return to the approach phase (pass entry)
    pub fn reset(&mut self) {
        self.state = ActuatorState::Idle;
    }

    /// Advance the state for a new distance reading
    pub fn evaluate(&mut self, distance_mm: f32) -> ActuatorState {
        self.state = if self.in_work_zone(distance_mm) {
            if self.state.actuators_on() {
                ActuatorState::Scrubbing
            } else {
                ActuatorState::Wetting
            }
        } else if distance_mm > self.distance_threshold_mm {
            ActuatorState::Finishing
        } else {
            ActuatorState::Idle
        };
        self.state
    }

    /// Evaluate and drive the valve and brush accordingly
    ///
    /// Outputs are re-asserted on every call.
    pub fn apply<V: Valve, B: BrushMotor>(
        &mut self,
        distance_mm: f32,
        valve: &mut V,
        brush: &mut B,
    ) -> Result<ActuatorState, MotorError> {
        let state = self.evaluate(distance_mm);

        if state.actuators_on() {
            valve.turn_on();
            brush.set_speed(self.brush_speed)?;
        } else {
            valve.turn_off();
            brush.stop()?;
        }

        Ok(state)
    }
}
