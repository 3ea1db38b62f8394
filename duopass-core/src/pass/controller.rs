//! Per-tick pass controller
//!
//! The controller is the central brain that, once per tick:
//! - Checks proximity sensor health (suppressing motion on a fault)
//! - Runs pass entry actions when a pass starts
//! - Updates wheel velocity regulation at its own cadence
//! - Sequences valve and brush from the travelled distance
//! - Detects end of travel and the travel guard
//! - Decides whether to run the mirrored return pass
//!
//! `tick` never blocks; an external scheduler calls it with a
//! monotonic millisecond timestamp.

use crate::config::{ConfigError, ControllerConfig};
use crate::control::odometry;
use crate::control::{ActuatorSequencer, ActuatorState, DriveCommand, VelocityRegulator};
use crate::diagnostics::{Diagnostic, DiagnosticSink, MotorRole};
use crate::safety::{SafetyInterlock, SafetyStatus};
use crate::state::{PassDirection, PassEvent, PassState, StopReason};
use crate::traits::{
    BrushMotor, Direction, DriveMotor, LimitSwitch, MotorError, ProximitySensor, Valve,
    WheelEncoder,
};

use super::hardware::PassHardware;

/// Maximum number of passes (one per direction)
pub const MAX_PASSES: u8 = 2;

/// Record of a completed pass
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassSummary {
    pub direction: PassDirection,
    /// Travelled distance when the pass stopped (mm)
    pub distance_mm: f32,
    /// Time from pass entry to stop, excluding interlock pauses (ms)
    pub duration_ms: u32,
    pub reason: StopReason,
}

impl PassSummary {
    /// Human readable stop reason
    pub fn reason_name(&self) -> &'static str {
        match self.reason {
            StopReason::LimitSwitch => "limit switch",
            StopReason::Proximity => "proximity sensor",
            StopReason::TravelLimit => "travel limit",
        }
    }
}

/// Result of one controller tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Terminal state; nothing was commanded
    Idle,
    /// Proximity sensor fault; drive forced to zero, nothing else touched
    Interlocked(PassDirection),
    /// Pass in progress
    Moving {
        distance_mm: f32,
        actuators: ActuatorState,
    },
    /// Pass stopped on this tick
    PassComplete(PassSummary),
}

/// Pass controller coordinating regulation, sequencing, and safety
pub struct PassController<M, B, E, L, P, V, D> {
    config: ControllerConfig,
    hardware: PassHardware<M, B, E, L, P, V>,
    sink: D,
    interlock: SafetyInterlock,
    regulator: VelocityRegulator,
    sequencer: ActuatorSequencer,
    /// Current pass state
    state: PassState,
    /// Current travel direction
    direction: PassDirection,
    /// Entry actions done for the current pass
    armed: bool,
    /// Timestamp of the current pass entry (ms), shifted forward by
    /// interlock pauses so it only measures time spent moving
    pass_started_ms: u32,
    /// Timestamp of the first tick of the current interlock
    interlocked_since: Option<u32>,
    passes_completed: u8,
    last_summary: Option<PassSummary>,
    /// Drive command last sent to the motors
    applied: DriveCommand,
}

impl<M, B, E, L, P, V, D> PassController<M, B, E, L, P, V, D>
where
    M: DriveMotor,
    B: BrushMotor,
    E: WheelEncoder,
    L: LimitSwitch,
    P: ProximitySensor,
    V: Valve,
    D: DiagnosticSink,
{
    /// Create a controller
    ///
    /// Fails if the configuration is inconsistent. No hardware is touched
    /// until the first tick.
    pub fn new(
        config: ControllerConfig,
        hardware: PassHardware<M, B, E, L, P, V>,
        sink: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            interlock: SafetyInterlock::new(config.check_both_sides),
            regulator: VelocityRegulator::new(&config),
            sequencer: ActuatorSequencer::new(&config),
            state: PassState::Approaching,
            direction: config.initial_direction,
            armed: false,
            pass_started_ms: 0,
            interlocked_since: None,
            passes_completed: 0,
            last_summary: None,
            applied: DriveCommand::STOPPED,
            config,
            hardware,
            sink,
        })
    }

    /// Get the current pass state
    pub fn state(&self) -> PassState {
        self.state
    }

    /// Get the current travel direction
    pub fn direction(&self) -> PassDirection {
        self.direction
    }

    /// Get the number of completed passes
    pub fn passes_completed(&self) -> u8 {
        self.passes_completed
    }

    /// Get the most recent completed pass
    pub fn last_summary(&self) -> Option<&PassSummary> {
        self.last_summary.as_ref()
    }

    /// Get the drive command last sent to the motors
    pub fn drive_command(&self) -> DriveCommand {
        self.applied
    }

    /// Get the current actuator phase
    pub fn actuator_state(&self) -> ActuatorState {
        self.sequencer.state()
    }

    /// Get the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Get the regulator
    pub fn regulator(&self) -> &VelocityRegulator {
        &self.regulator
    }

    /// Get access to the hardware
    pub fn hardware(&self) -> &PassHardware<M, B, E, L, P, V> {
        &self.hardware
    }

    /// Get mutable access to the hardware
    pub fn hardware_mut(&mut self) -> &mut PassHardware<M, B, E, L, P, V> {
        &mut self.hardware
    }

    /// Get access to the diagnostic sink
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Check if the controller reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Run one control cycle
    pub fn tick(&mut self, now_ms: u32) -> TickOutcome {
        if !self.state.motion_allowed() {
            return TickOutcome::Idle;
        }

        if let SafetyStatus::SensorFault(side) = self.check_safety() {
            self.halt_drive();
            self.interlocked_since.get_or_insert(now_ms);
            self.sink.emit(Diagnostic::SensorFault(side));
            return TickOutcome::Interlocked(side);
        }

        if let Some(since) = self.interlocked_since.take() {
            self.resume(since, now_ms);
        }

        if !self.armed {
            self.begin_pass(now_ms);
        }

        self.regulate(now_ms);

        let drivetrain = &mut self.hardware.drivetrain;
        let distance_mm =
            odometry::traveled(&mut drivetrain.left_encoder, &mut drivetrain.right_encoder);

        let actuators = self.sequence(distance_mm);
        if actuators.actuators_on() {
            self.state = self.state.transition(PassEvent::WorkZoneEntered);
        }

        if let Some(reason) = self.end_of_travel(now_ms, distance_mm) {
            let summary = self.finish_pass(now_ms, distance_mm, reason);
            return TickOutcome::PassComplete(summary);
        }

        TickOutcome::Moving {
            distance_mm,
            actuators,
        }
    }

    /// Evaluate sensor health and report recoveries
    fn check_safety(&mut self) -> SafetyStatus {
        let direction = self.direction;
        let (active, opposite) = self.hardware.sides_mut(direction);
        let status = self
            .interlock
            .check(direction, &mut active.proximity, &mut opposite.proximity);

        while let Some(side) = self.interlock.take_recovered() {
            self.sink.emit(Diagnostic::SensorRecovered(side));
        }

        status
    }

    /// First healthy tick after an interlock
    ///
    /// The pause does not count toward the travel guard, and regulation
    /// restarts from a fresh interval instead of integrating over the outage.
    fn resume(&mut self, since_ms: u32, now_ms: u32) {
        self.regulator.restart(now_ms);
        let drivetrain = &mut self.hardware.drivetrain;
        drivetrain.left_encoder.reset_velocity();
        drivetrain.right_encoder.reset_velocity();

        if self.armed {
            let paused = now_ms.wrapping_sub(since_ms);
            self.pass_started_ms = self.pass_started_ms.wrapping_add(paused);
            self.apply_drive(self.regulator.last_command());
        }
    }

    /// Pass entry: zero distance, orient the drive, resume the last command
    fn begin_pass(&mut self, now_ms: u32) {
        let drivetrain = &mut self.hardware.drivetrain;
        odometry::reset(&mut drivetrain.left_encoder, &mut drivetrain.right_encoder);
        self.sequencer.reset();

        if self.config.reset_pid_between_passes {
            self.regulator.reset();
        }

        let left_dir = match self.direction {
            PassDirection::Forward => Direction::Forward,
            PassDirection::Backward => Direction::Backward,
        };
        let right_dir = if self.config.mirror_right_motor {
            left_dir.opposite()
        } else {
            left_dir
        };

        let result = drivetrain.left.set_direction(left_dir);
        report(&mut self.sink, MotorRole::LeftDrive, result);
        let result = drivetrain.right.set_direction(right_dir);
        report(&mut self.sink, MotorRole::RightDrive, result);

        self.apply_drive(self.regulator.last_command());

        self.pass_started_ms = now_ms;
        self.armed = true;
        self.sink.emit(Diagnostic::PassStarted(self.direction));
    }

    /// Rate-limited wheel velocity regulation
    fn regulate(&mut self, now_ms: u32) {
        let Some(dt) = self.regulator.poll(now_ms) else {
            return;
        };

        let drivetrain = &mut self.hardware.drivetrain;
        let left_velocity = drivetrain.left_encoder.velocity();
        let right_velocity = drivetrain.right_encoder.velocity();

        let command = self.regulator.update(
            self.config.target_velocity,
            left_velocity,
            right_velocity,
            dt,
        );
        self.apply_drive(command);

        let drivetrain = &mut self.hardware.drivetrain;
        drivetrain.left_encoder.reset_velocity();
        drivetrain.right_encoder.reset_velocity();
    }

    /// Drive the pass-side valve and the brush from the distance
    fn sequence(&mut self, distance_mm: f32) -> ActuatorState {
        let hardware = &mut self.hardware;
        let side = match self.direction {
            PassDirection::Forward => &mut hardware.forward,
            PassDirection::Backward => &mut hardware.backward,
        };

        match self
            .sequencer
            .apply(distance_mm, &mut side.valve, &mut hardware.brush)
        {
            Ok(state) => state,
            Err(e) => {
                self.sink.emit(Diagnostic::MotorFault(MotorRole::Brush, e));
                self.sequencer.state()
            }
        }
    }

    /// Check the pass-side trip sensors and the travel guard
    fn end_of_travel(&mut self, now_ms: u32, distance_mm: f32) -> Option<StopReason> {
        let side = self.hardware.side_mut(self.direction);

        if side.limit.is_triggered() {
            return Some(StopReason::LimitSwitch);
        }
        if side.proximity.read().is_tripped() {
            return Some(StopReason::Proximity);
        }

        let elapsed_ms = now_ms.wrapping_sub(self.pass_started_ms);
        if distance_mm > self.config.max_pass_distance_mm
            || elapsed_ms > self.config.max_pass_duration_ms
        {
            return Some(StopReason::TravelLimit);
        }

        None
    }

    /// Stop everything, record the pass, and run the reverse check
    fn finish_pass(&mut self, now_ms: u32, distance_mm: f32, reason: StopReason) -> PassSummary {
        self.halt_drive();
        let result = self.hardware.brush.stop();
        report(&mut self.sink, MotorRole::Brush, result);
        self.hardware.side_mut(self.direction).valve.turn_off();
        self.sequencer.reset();

        self.state = self.state.transition(PassEvent::EndOfTravel(reason));

        let summary = PassSummary {
            direction: self.direction,
            distance_mm,
            duration_ms: now_ms.wrapping_sub(self.pass_started_ms),
            reason,
        };
        self.passes_completed = self.passes_completed.saturating_add(1);
        self.last_summary = Some(summary);

        if reason.is_fault() {
            self.sink.emit(Diagnostic::TravelLimitExceeded(summary));
        } else {
            self.sink.emit(Diagnostic::PassComplete(summary));
        }

        self.state = self.state.transition(PassEvent::PassEnded);
        self.reverse_check(reason);

        summary
    }

    /// Flip direction in bidirectional mode and decide on another pass
    fn reverse_check(&mut self, reason: StopReason) {
        if self.config.bidirectional {
            self.direction = self.direction.opposite();
        }

        let another_pass = self.config.bidirectional
            && !reason.is_fault()
            && self.passes_completed < MAX_PASSES;

        let event = if another_pass {
            PassEvent::Reverse
        } else {
            PassEvent::Finish
        };
        self.state = self.state.transition(event);

        if another_pass {
            self.armed = false;
        } else {
            self.sink.emit(Diagnostic::Shutdown);
        }
    }

    /// Send a command to both drive motors
    fn apply_drive(&mut self, command: DriveCommand) {
        let drivetrain = &mut self.hardware.drivetrain;
        let result = drivetrain.left.set_speed(command.left);
        report(&mut self.sink, MotorRole::LeftDrive, result);
        let result = drivetrain.right.set_speed(command.right);
        report(&mut self.sink, MotorRole::RightDrive, result);
        self.applied = command;
    }

    /// Force both drive motors to zero
    fn halt_drive(&mut self) {
        let drivetrain = &mut self.hardware.drivetrain;
        let result = drivetrain.left.stop();
        report(&mut self.sink, MotorRole::LeftDrive, result);
        let result = drivetrain.right.stop();
        report(&mut self.sink, MotorRole::RightDrive, result);
        self.applied = DriveCommand::STOPPED;
    }
}

fn report<D: DiagnosticSink>(sink: &mut D, role: MotorRole, result: Result<(), MotorError>) {
    if let Err(e) = result {
        sink.emit(Diagnostic::MotorFault(role, e));
    }
}
