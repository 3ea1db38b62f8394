//! Solenoid valve on a GPIO output
//!
//! The pin drives a relay or MOSFET switching the solenoid. A failed pin
//! write leaves the recorded state unchanged and latches `has_fault`.

use duopass_core::traits::Valve;
use embedded_hal::digital::OutputPin;

/// Solenoid valve driven by a single output pin
pub struct SolenoidValve<P> {
    pin: P,
    /// Pin level that opens the valve
    active_high: bool,
    on: bool,
    fault: bool,
}

impl<P: OutputPin> SolenoidValve<P> {
    /// Create a valve; the pin is not touched until the first command
    pub fn new(pin: P, active_high: bool) -> Self {
        Self {
            pin,
            active_high,
            on: false,
            fault: false,
        }
    }

    /// Check if a pin write has failed since creation
    pub fn has_fault(&self) -> bool {
        self.fault
    }

    /// Release the output pin
    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, open: bool) {
        let result = if open == self.active_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        match result {
            Ok(()) => self.on = open,
            Err(_) => self.fault = true,
        }
    }
}

impl<P: OutputPin> Valve for SolenoidValve<P> {
    fn turn_on(&mut self) {
        self.drive(true);
    }

    fn turn_off(&mut self) {
        self.drive(false);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
