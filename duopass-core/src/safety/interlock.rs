//! Safety interlock implementation
//!
//! Re-evaluated at the start of every tick. A fault suppresses motion for
//! that tick only; there is no latched fault state.

use crate::state::PassDirection;
use crate::traits::ProximitySensor;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All checked sensors healthy
    Ok,
    /// The proximity sensor on this side reports it is not working
    SensorFault(PassDirection),
}

impl SafetyStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SafetyStatus::Ok)
    }
}

fn side_index(side: PassDirection) -> usize {
    match side {
        PassDirection::Forward => 0,
        PassDirection::Backward => 1,
    }
}

fn side_from_index(index: usize) -> PassDirection {
    if index == 0 {
        PassDirection::Forward
    } else {
        PassDirection::Backward
    }
}

/// Safety interlock on proximity sensor health
#[derive(Debug, Clone)]
pub struct SafetyInterlock {
    /// Also check the sensor on the side opposite to travel
    check_both_sides: bool,
    /// Sensor health seen on the previous check, per side
    faulted: [bool; 2],
    /// Sides that went from faulted to healthy and have not been reported
    recovered: [bool; 2],
}

impl SafetyInterlock {
    /// Create a new interlock
    pub fn new(check_both_sides: bool) -> Self {
        Self {
            check_both_sides,
            faulted: [false; 2],
            recovered: [false; 2],
        }
    }

    /// Check the sensors gating travel in `direction`
    ///
    /// `active` is the pass-side sensor, `opposite` the other one. Returns
    /// the first fault found, active side first.
    pub fn check<P: ProximitySensor>(
        &mut self,
        direction: PassDirection,
        active: &mut P,
        opposite: &mut P,
    ) -> SafetyStatus {
        let mut status = SafetyStatus::Ok;

        let active_ok = active.read().is_healthy();
        self.record(direction, active_ok);
        if !active_ok {
            status = SafetyStatus::SensorFault(direction);
        }

        if self.check_both_sides {
            let side = direction.opposite();
            let opposite_ok = opposite.read().is_healthy();
            self.record(side, opposite_ok);
            if !opposite_ok && status.is_ok() {
                status = SafetyStatus::SensorFault(side);
            }
        }

        status
    }

    fn record(&mut self, side: PassDirection, healthy: bool) {
        let i = side_index(side);
        if self.faulted[i] && healthy {
            self.recovered[i] = true;
        }
        if !healthy {
            self.recovered[i] = false;
        }
        self.faulted[i] = !healthy;
    }

    /// Take one side that recovered since it was last reported
    pub fn take_recovered(&mut self) -> Option<PassDirection> {
        let i = self.recovered.iter().position(|r| *r)?;
        self.recovered[i] = false;
        Some(side_from_index(i))
    }
}
