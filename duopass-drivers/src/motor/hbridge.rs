//! Dual-PWM H-bridge motor driver
//!
//! Each motor has two PWM inputs. Forward rotation drives the first input
//! and holds the second at zero duty; backward rotation swaps them.
//!
//! This driver provides:
//! - Normalized speed (0.0-1.0) mapped onto the PWM duty range
//! - Minimum duty cycle handling (below which the motor won't turn)
//! - Direction control by input selection
//!
//! ```ignore
//! let mut motor = HBridgeMotor::new(pwm_a, pwm_b, HBridgeConfig::default());
//! DriveMotor::set_direction(&mut motor, Direction::Forward)?;
//! DriveMotor::set_speed(&mut motor, 0.42)?;
//! ```

use duopass_core::traits::{BrushMotor, Direction, DriveMotor, MotorError};
use embedded_hal::pwm::SetDutyCycle;

/// H-bridge driver configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HBridgeConfig {
    /// Minimum duty cycle percentage (below this the motor won't start)
    pub min_duty_percent: u8,
    /// Swap the meaning of the two inputs
    pub reversed: bool,
}

impl Default for HBridgeConfig {
    fn default() -> Self {
        Self {
            min_duty_percent: 0,
            reversed: false,
        }
    }
}

/// H-bridge motor on two PWM channels
pub struct HBridgeMotor<A, B> {
    pwm_a: A,
    pwm_b: B,
    config: HBridgeConfig,
    /// Commanded speed (0.0-1.0)
    speed: f32,
    direction: Direction,
}

impl<A: SetDutyCycle, B: SetDutyCycle> HBridgeMotor<A, B> {
    /// Create a new driver; the motor starts stopped, direction forward
    pub fn new(pwm_a: A, pwm_b: B, config: HBridgeConfig) -> Self {
        Self {
            pwm_a,
            pwm_b,
            config,
            speed: 0.0,
            direction: Direction::Forward,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &HBridgeConfig {
        &self.config
    }

    /// Release the PWM channels
    pub fn release(self) -> (A, B) {
        (self.pwm_a, self.pwm_b)
    }

    /// Scale the speed to a duty cycle fraction
    ///
    /// Maps (0, 1] onto [min_duty, 1], so that 0 = off and 1 = full power,
    /// with the dead zone below min_duty skipped.
    fn scale_duty(&self, speed: f32) -> f32 {
        if speed <= 0.0 {
            0.0
        } else {
            let min = self.config.min_duty_percent.min(100) as f32 / 100.0;
            (min + speed * (1.0 - min)).min(1.0)
        }
    }

    fn duty_counts(max: u16, fraction: f32) -> u16 {
        (max as f32 * fraction + 0.5) as u16
    }

    /// Write the current speed and direction to the PWM channels
    fn write(&mut self) -> Result<(), MotorError> {
        let fraction = self.scale_duty(self.speed);
        let a_active = (self.direction == Direction::Forward) != self.config.reversed;

        // Release the idle input first so both are never driven together
        if a_active {
            self.pwm_b.set_duty_cycle_fully_off().map_err(|_| MotorError::Pwm)?;
            let duty = Self::duty_counts(self.pwm_a.max_duty_cycle(), fraction);
            self.pwm_a.set_duty_cycle(duty).map_err(|_| MotorError::Pwm)
        } else {
            self.pwm_a.set_duty_cycle_fully_off().map_err(|_| MotorError::Pwm)?;
            let duty = Self::duty_counts(self.pwm_b.max_duty_cycle(), fraction);
            self.pwm_b.set_duty_cycle(duty).map_err(|_| MotorError::Pwm)
        }
    }

    fn command_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        if !speed.is_finite() {
            return Err(MotorError::InvalidSpeed);
        }
        self.speed = speed.clamp(0.0, 1.0);
        self.write()
    }

    fn command_stop(&mut self) -> Result<(), MotorError> {
        self.speed = 0.0;
        self.write()
    }
}

impl<A: SetDutyCycle, B: SetDutyCycle> DriveMotor for HBridgeMotor<A, B> {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.command_speed(speed)
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), MotorError> {
        self.direction = dir;
        self.write()
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.command_stop()
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

impl<A: SetDutyCycle, B: SetDutyCycle> BrushMotor for HBridgeMotor<A, B> {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.command_speed(speed)
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.command_stop()
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}
