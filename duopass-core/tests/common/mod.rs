//! Mock hardware shared by the integration tests

#![allow(dead_code)]

use duopass_core::config::ControllerConfig;
use duopass_core::diagnostics::{Diagnostic, DiagnosticSink};
use duopass_core::pass::{Drivetrain, PassController, PassHardware, PassSide};
use duopass_core::traits::{
    BrushMotor, Direction, DriveMotor, LimitSwitch, MotorError, ProximityReading,
    ProximitySensor, Valve, WheelEncoder,
};

/// Drive motor mock; with `fail` set every command is rejected unchanged
#[derive(Debug, Default)]
pub struct MockMotor {
    pub speed: f32,
    pub direction: Direction,
    pub commands: u32,
    pub fail: bool,
}

impl MockMotor {
    fn command(&mut self) -> Result<(), MotorError> {
        self.commands += 1;
        if self.fail {
            Err(MotorError::Pwm)
        } else {
            Ok(())
        }
    }
}

impl DriveMotor for MockMotor {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.command()?;
        self.speed = speed.clamp(0.0, 1.0);
        Ok(())
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), MotorError> {
        self.command()?;
        self.direction = dir;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.command()?;
        self.speed = 0.0;
        Ok(())
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

#[derive(Debug, Default)]
pub struct MockBrush {
    pub speed: f32,
    pub commands: u32,
    pub fail: bool,
}

impl MockBrush {
    fn command(&mut self) -> Result<(), MotorError> {
        self.commands += 1;
        if self.fail {
            Err(MotorError::Pwm)
        } else {
            Ok(())
        }
    }
}

impl BrushMotor for MockBrush {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.command()?;
        self.speed = speed;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.command()?;
        self.speed = 0.0;
        Ok(())
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}

#[derive(Debug, Default)]
pub struct MockEncoder {
    pub distance: f32,
    pub velocity: f32,
    pub distance_resets: u32,
    pub velocity_resets: u32,
}

impl WheelEncoder for MockEncoder {
    fn velocity(&mut self) -> f32 {
        self.velocity
    }

    fn distance(&mut self) -> f32 {
        self.distance
    }

    fn reset_velocity(&mut self) {
        self.velocity_resets += 1;
    }

    fn reset_distance(&mut self) {
        self.distance = 0.0;
        self.distance_resets += 1;
    }
}

#[derive(Debug, Default)]
pub struct MockLimit {
    pub triggered: bool,
}

impl LimitSwitch for MockLimit {
    fn is_triggered(&mut self) -> bool {
        self.triggered
    }
}

#[derive(Debug)]
pub struct MockProximity {
    pub reading: ProximityReading,
}

impl Default for MockProximity {
    fn default() -> Self {
        Self {
            reading: ProximityReading::Clear,
        }
    }
}

impl ProximitySensor for MockProximity {
    fn read(&mut self) -> ProximityReading {
        self.reading
    }
}

#[derive(Debug, Default)]
pub struct MockValve {
    pub on: bool,
    pub commands: u32,
}

impl Valve for MockValve {
    fn turn_on(&mut self) {
        self.on = true;
        self.commands += 1;
    }

    fn turn_off(&mut self) {
        self.on = false;
        self.commands += 1;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.diagnostics.iter().filter(|d| pred(d)).count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

pub type MockHardware =
    PassHardware<MockMotor, MockBrush, MockEncoder, MockLimit, MockProximity, MockValve>;

pub type Controller = PassController<
    MockMotor,
    MockBrush,
    MockEncoder,
    MockLimit,
    MockProximity,
    MockValve,
    RecordingSink,
>;

fn side() -> PassSide<MockLimit, MockProximity, MockValve> {
    PassSide {
        limit: MockLimit::default(),
        proximity: MockProximity::default(),
        valve: MockValve::default(),
    }
}

pub fn hardware() -> MockHardware {
    PassHardware {
        drivetrain: Drivetrain {
            left: MockMotor::default(),
            right: MockMotor::default(),
            left_encoder: MockEncoder::default(),
            right_encoder: MockEncoder::default(),
        },
        brush: MockBrush::default(),
        forward: side(),
        backward: side(),
    }
}

/// Thresholds 10/100 mm with a 1000 mm travel guard
pub fn test_config() -> ControllerConfig {
    ControllerConfig {
        width_threshold_mm: 10.0,
        distance_threshold_mm: 100.0,
        max_pass_distance_mm: 1000.0,
        ..Default::default()
    }
}

pub fn controller(config: ControllerConfig) -> Controller {
    PassController::new(config, hardware(), RecordingSink::default()).unwrap()
}

/// Set both wheel distances
pub fn set_distance(controller: &mut Controller, distance_mm: f32) {
    let drivetrain = &mut controller.hardware_mut().drivetrain;
    drivetrain.left_encoder.distance = distance_mm;
    drivetrain.right_encoder.distance = distance_mm;
}

/// Total commands sent to drive and brush motors
pub fn motor_commands(controller: &Controller) -> u32 {
    let hw = controller.hardware();
    hw.drivetrain.left.commands + hw.drivetrain.right.commands + hw.brush.commands
}
