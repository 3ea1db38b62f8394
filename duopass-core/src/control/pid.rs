//! PID controller
//!
//! Floating point PID with output clamping and optional integral clamping.
//! One instance regulates one wheel.

use crate::config::PidGains;

/// PID controller state
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pid {
    gains: PidGains,
    min_output: f32,
    max_output: f32,
    /// Clamp `ki * integral` to the output bounds
    anti_windup: bool,
    /// Accumulated error × seconds
    integral: f32,
    /// Previous error for derivative calculation
    prev_error: f32,
}

impl Pid {
    /// Create a new controller with zeroed history
    pub fn new(gains: PidGains, min_output: f32, max_output: f32, anti_windup: bool) -> Self {
        Self {
            gains,
            min_output,
            max_output,
            anti_windup,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Get the gains
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    /// Get the accumulated integral
    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Clear integral and derivative history
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Calculate the controller output
    ///
    /// `dt` is the time since the previous call in seconds. With `dt <= 0`
    /// the integral is left untouched and the derivative term is zero.
    pub fn calculate(&mut self, setpoint: f32, measurement: f32, dt: f32) -> f32 {
        let error = setpoint - measurement;

        let derivative = if dt > 0.0 {
            self.integral += error * dt;
            (error - self.prev_error) / dt
        } else {
            0.0
        };
        self.prev_error = error;

        if self.anti_windup && self.gains.ki > 0.0 {
            let lo = self.min_output / self.gains.ki;
            let hi = self.max_output / self.gains.ki;
            self.integral = self.integral.clamp(lo, hi);
        }

        let output = self.gains.kp * error
            + self.gains.ki * self.integral
            + self.gains.kd * derivative;

        output.clamp(self.min_output, self.max_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-5 && d > -1e-5
    }

    #[test]
    fn test_first_tick_output() {
        let mut pid = Pid::new(PidGains::new(2.0, 0.1, 0.1), 0.0, 1.0, true);
        let out = pid.calculate(0.14, 0.0, 0.1);
        // 2.0*0.14 + 0.1*0.014 + 0.1*1.4
        assert!(approx(out, 0.4214));
        assert!(approx(pid.integral(), 0.014));
    }

    #[test]
    fn test_output_clamped() {
        let mut pid = Pid::new(PidGains::new(50.0, 0.0, 0.0), 0.0, 1.0, true);
        assert_eq!(pid.calculate(0.14, 0.0, 0.1), 1.0);
        // Overspeed drives output to the lower bound, never negative
        assert_eq!(pid.calculate(0.14, 1.0, 0.1), 0.0);
    }

    #[test]
    fn test_steady_state_integral_constant() {
        let mut pid = Pid::new(PidGains::new(2.0, 0.1, 0.1), 0.0, 1.0, true);
        pid.calculate(0.14, 0.10, 0.1);
        let integral = pid.integral();

        for _ in 0..100 {
            pid.calculate(0.14, 0.14, 0.1);
        }
        assert_eq!(pid.integral(), integral);
    }

    #[test]
    fn test_anti_windup_clamps_integral() {
        let mut pid = Pid::new(PidGains::new(0.0, 0.5, 0.0), 0.0, 1.0, true);
        for _ in 0..1000 {
            pid.calculate(1.0, 0.0, 0.1);
        }
        // ki * integral limited to max_output
        assert!(approx(pid.integral(), 2.0));
    }

    #[test]
    fn test_unclamped_integral_keeps_growing() {
        let mut pid = Pid::new(PidGains::new(0.0, 0.5, 0.0), 0.0, 1.0, false);
        for _ in 0..1000 {
            pid.calculate(1.0, 0.0, 0.1);
        }
        assert!(pid.integral() > 99.0);
    }

    #[test]
    fn test_zero_dt() {
        let mut pid = Pid::new(PidGains::new(2.0, 0.1, 0.1), 0.0, 1.0, true);
        let out = pid.calculate(0.14, 0.0, 0.0);
        assert!(approx(out, 0.28));
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut pid = Pid::new(PidGains::new(2.0, 0.1, 0.1), 0.0, 1.0, true);
        pid.calculate(0.14, 0.0, 0.1);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        // Same as a fresh controller
        assert!(approx(pid.calculate(0.14, 0.0, 0.1), 0.4214));
    }
}
