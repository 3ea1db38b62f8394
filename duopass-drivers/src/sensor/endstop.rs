//! End-of-travel limit switch

use duopass_core::traits::LimitSwitch;
use embedded_hal::digital::InputPin;

/// Limit switch on a GPIO input
///
/// A failed read counts as triggered so the drive stops.
pub struct Endstop<P> {
    pin: P,
    /// Pin level when the switch is pressed
    active_high: bool,
}

impl<P: InputPin> Endstop<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    /// Release the input pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> LimitSwitch for Endstop<P> {
    fn is_triggered(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high == self.active_high,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_active_high() {
        let expectations = [Transaction::get(State::Low), Transaction::get(State::High)];
        let mut endstop = Endstop::new(PinMock::new(&expectations), true);

        assert!(!endstop.is_triggered());
        assert!(endstop.is_triggered());

        let mut pin = endstop.release();
        pin.done();
    }

    #[test]
    fn test_active_low() {
        // Normally-closed switch pulled up; pressing grounds the input
        let expectations = [Transaction::get(State::High), Transaction::get(State::Low)];
        let mut endstop = Endstop::new(PinMock::new(&expectations), false);

        assert!(!endstop.is_triggered());
        assert!(endstop.is_triggered());

        let mut pin = endstop.release();
        pin.done();
    }

    #[test]
    fn test_read_error_is_triggered() {
        let expectations = [Transaction::get(State::Low).with_error(MockError::Io(ErrorKind::Other))];
        let mut endstop = Endstop::new(PinMock::new(&expectations), true);

        assert!(endstop.is_triggered());

        let mut pin = endstop.release();
        pin.done();
    }
}
