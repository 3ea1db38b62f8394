//! Simulated robot on a straight track
//!
//! All simulated devices share one [`World`]. The controller commands the
//! motors and valves through the collaborator traits; [`Plant::step`]
//! advances the physics and feeds the encoder pulse counters.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use duopass_core::state::PassDirection;
use duopass_core::traits::{
    BrushMotor, Direction, DriveMotor, LimitSwitch, MotorError, ProximityReading,
    ProximitySensor, Valve,
};
use duopass_drivers::encoder::PulseCounter;

use crate::config::PlantConfig;

/// Drive wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Left,
    Right,
}

impl Wheel {
    fn index(self) -> usize {
        match self {
            Wheel::Left => 0,
            Wheel::Right => 1,
        }
    }
}

fn side_index(side: PassDirection) -> usize {
    match side {
        PassDirection::Forward => 0,
        PassDirection::Backward => 1,
    }
}

#[derive(Debug, Default)]
struct WheelState {
    duty: f32,
    direction: Direction,
    /// Actual surface speed (m/s)
    velocity: f32,
    /// Fraction of an encoder edge not yet emitted
    pulse_residue: f32,
    counter: Arc<PulseCounter>,
}

/// Shared simulation state
#[derive(Debug)]
pub struct World {
    config: PlantConfig,
    right_mirrored: bool,
    /// Distance from the backward end stop (mm)
    position_mm: f32,
    wheels: [WheelState; 2],
    brush_speed: f32,
    valves: [bool; 2],
    sensor_faults: [bool; 2],
}

impl World {
    fn gap_mm(&self, side: PassDirection) -> f32 {
        match side {
            PassDirection::Forward => self.config.track_length_mm - self.position_mm,
            PassDirection::Backward => self.position_mm,
        }
    }

    fn signed(direction: Direction, mirrored: bool) -> f32 {
        match (direction, mirrored) {
            (Direction::Forward, false) | (Direction::Backward, true) => 1.0,
            _ => -1.0,
        }
    }

    fn step(&mut self, dt_ms: u32) {
        let dt = dt_ms as f32;
        let mm_per_pulse = self.config.wheel_circumference_mm / self.config.pulses_per_rev as f32;
        let tau = self.config.motor_time_constant_ms;
        let alpha = if tau <= 0.0 { 1.0 } else { (dt / tau).min(1.0) };

        let mut delta = 0.0;
        for (index, wheel) in self.wheels.iter_mut().enumerate() {
            let gain = if index == Wheel::Right.index() {
                self.config.right_wheel_gain
            } else {
                1.0
            };
            let target = wheel.duty * self.config.max_wheel_speed * gain;
            wheel.velocity += (target - wheel.velocity) * alpha;

            // m/s times ms is mm
            let travel = wheel.velocity * dt;
            wheel.pulse_residue += travel / mm_per_pulse;
            let whole = wheel.pulse_residue.floor();
            wheel.pulse_residue -= whole;
            wheel.counter.add(whole as u32);

            let mirrored = index == Wheel::Right.index() && self.right_mirrored;
            delta += Self::signed(wheel.direction, mirrored) * travel / 2.0;
        }

        self.position_mm = (self.position_mm + delta).clamp(0.0, self.config.track_length_mm);
    }
}

pub type SharedWorld = Rc<RefCell<World>>;

/// Handle to the simulated robot
pub struct Plant {
    world: SharedWorld,
}

impl Plant {
    /// Build the plant; `right_mirrored` must match the controller's mounting
    pub fn new(config: &PlantConfig, right_mirrored: bool) -> Self {
        let world = World {
            config: config.clone(),
            right_mirrored,
            position_mm: config.start_position_mm,
            wheels: Default::default(),
            brush_speed: 0.0,
            valves: [false; 2],
            sensor_faults: [false; 2],
        };
        Self {
            world: Rc::new(RefCell::new(world)),
        }
    }

    /// Advance the physics by `dt_ms`
    pub fn step(&self, dt_ms: u32) {
        self.world.borrow_mut().step(dt_ms);
    }

    pub fn position_mm(&self) -> f32 {
        self.world.borrow().position_mm
    }

    pub fn wheel_velocity(&self, wheel: Wheel) -> f32 {
        self.world.borrow().wheels[wheel.index()].velocity
    }

    pub fn brush_speed(&self) -> f32 {
        self.world.borrow().brush_speed
    }

    pub fn valve_open(&self, side: PassDirection) -> bool {
        self.world.borrow().valves[side_index(side)]
    }

    pub fn set_sensor_fault(&self, side: PassDirection, faulted: bool) {
        self.world.borrow_mut().sensor_faults[side_index(side)] = faulted;
    }

    /// Pulse counter fed by `wheel`
    pub fn counter(&self, wheel: Wheel) -> Arc<PulseCounter> {
        Arc::clone(&self.world.borrow().wheels[wheel.index()].counter)
    }

    pub fn drive(&self, wheel: Wheel) -> SimDrive {
        SimDrive {
            world: Rc::clone(&self.world),
            wheel,
            speed: 0.0,
            direction: Direction::Forward,
        }
    }

    pub fn brush(&self) -> SimBrush {
        SimBrush {
            world: Rc::clone(&self.world),
            speed: 0.0,
        }
    }

    pub fn limit(&self, side: PassDirection) -> SimLimit {
        SimLimit {
            world: Rc::clone(&self.world),
            side,
        }
    }

    pub fn proximity(&self, side: PassDirection) -> SimProximity {
        SimProximity {
            world: Rc::clone(&self.world),
            side,
        }
    }

    pub fn valve(&self, side: PassDirection) -> SimValve {
        SimValve {
            world: Rc::clone(&self.world),
            side,
        }
    }
}

fn checked_speed(speed: f32) -> Result<f32, MotorError> {
    if speed.is_finite() {
        Ok(speed.clamp(0.0, 1.0))
    } else {
        Err(MotorError::InvalidSpeed)
    }
}

/// Simulated drive motor
pub struct SimDrive {
    world: SharedWorld,
    wheel: Wheel,
    speed: f32,
    direction: Direction,
}

impl DriveMotor for SimDrive {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.speed = checked_speed(speed)?;
        self.world.borrow_mut().wheels[self.wheel.index()].duty = self.speed;
        Ok(())
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), MotorError> {
        self.direction = dir;
        self.world.borrow_mut().wheels[self.wheel.index()].direction = dir;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.set_speed(0.0)
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn direction(&self) -> Direction {
        self.direction
    }
}

/// Simulated brush motor
pub struct SimBrush {
    world: SharedWorld,
    speed: f32,
}

impl BrushMotor for SimBrush {
    fn set_speed(&mut self, speed: f32) -> Result<(), MotorError> {
        self.speed = checked_speed(speed)?;
        self.world.borrow_mut().brush_speed = self.speed;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MotorError> {
        self.set_speed(0.0)
    }

    fn speed(&self) -> f32 {
        self.speed
    }
}

/// Simulated end stop, pressed when the robot reaches its end of the track
pub struct SimLimit {
    world: SharedWorld,
    side: PassDirection,
}

impl LimitSwitch for SimLimit {
    fn is_triggered(&mut self) -> bool {
        self.world.borrow().gap_mm(self.side) <= 0.0
    }
}

/// Simulated proximity sensor facing one end of the track
pub struct SimProximity {
    world: SharedWorld,
    side: PassDirection,
}

impl ProximitySensor for SimProximity {
    fn read(&mut self) -> ProximityReading {
        let world = self.world.borrow();
        if world.sensor_faults[side_index(self.side)] {
            ProximityReading::Fault
        } else if world.gap_mm(self.side) < world.config.proximity_range_mm {
            ProximityReading::Tripped
        } else {
            ProximityReading::Clear
        }
    }
}

/// Simulated solenoid valve
pub struct SimValve {
    world: SharedWorld,
    side: PassDirection,
}

impl Valve for SimValve {
    fn turn_on(&mut self) {
        self.world.borrow_mut().valves[side_index(self.side)] = true;
    }

    fn turn_off(&mut self) {
        self.world.borrow_mut().valves[side_index(self.side)] = false;
    }

    fn is_on(&self) -> bool {
        self.world.borrow().valves[side_index(self.side)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plant_config() -> PlantConfig {
        PlantConfig {
            track_length_mm: 1000.0,
            max_wheel_speed: 0.2,
            motor_time_constant_ms: 0.0,
            pulses_per_rev: 100,
            wheel_circumference_mm: 100.0,
            ..PlantConfig::default()
        }
    }

    #[test]
    fn test_mirrored_drive_moves_forward() {
        let plant = Plant::new(&plant_config(), true);
        let mut left = plant.drive(Wheel::Left);
        let mut right = plant.drive(Wheel::Right);
        right.set_direction(Direction::Backward).unwrap();
        left.set_speed(1.0).unwrap();
        right.set_speed(1.0).unwrap();

        // 0.2 m/s for 100 ms
        plant.step(100);
        assert!((plant.position_mm() - 20.0).abs() < 1e-3);
        assert_eq!(plant.counter(Wheel::Left).count(), 20);
        assert_eq!(plant.counter(Wheel::Right).count(), 20);
    }

    #[test]
    fn test_motor_lag() {
        let config = PlantConfig {
            motor_time_constant_ms: 100.0,
            ..plant_config()
        };
        let plant = Plant::new(&config, true);
        let mut left = plant.drive(Wheel::Left);
        left.set_speed(1.0).unwrap();

        plant.step(10);
        let v = plant.wheel_velocity(Wheel::Left);
        assert!(v > 0.0 && v < 0.2);
    }

    #[test]
    fn test_end_stops() {
        let plant = Plant::new(&plant_config(), true);
        let mut forward = plant.limit(PassDirection::Forward);
        let mut backward = plant.limit(PassDirection::Backward);
        assert!(backward.is_triggered());
        assert!(!forward.is_triggered());

        let mut left = plant.drive(Wheel::Left);
        let mut right = plant.drive(Wheel::Right);
        right.set_direction(Direction::Backward).unwrap();
        left.set_speed(1.0).unwrap();
        right.set_speed(1.0).unwrap();
        for _ in 0..100 {
            plant.step(100);
        }

        assert_eq!(plant.position_mm(), 1000.0);
        assert!(forward.is_triggered());
        assert!(!backward.is_triggered());
    }

    #[test]
    fn test_proximity_fault_and_range() {
        let config = PlantConfig {
            proximity_range_mm: 50.0,
            ..plant_config()
        };
        let plant = Plant::new(&config, true);
        let mut forward = plant.proximity(PassDirection::Forward);
        let mut backward = plant.proximity(PassDirection::Backward);

        assert_eq!(forward.read(), ProximityReading::Clear);
        assert_eq!(backward.read(), ProximityReading::Tripped);

        plant.set_sensor_fault(PassDirection::Forward, true);
        assert_eq!(forward.read(), ProximityReading::Fault);
    }

    #[test]
    fn test_valves_and_brush() {
        let plant = Plant::new(&plant_config(), true);
        let mut valve = plant.valve(PassDirection::Backward);
        let mut brush = plant.brush();

        valve.turn_on();
        brush.set_speed(0.8).unwrap();
        assert!(plant.valve_open(PassDirection::Backward));
        assert!(!plant.valve_open(PassDirection::Forward));
        assert_eq!(plant.brush_speed(), 0.8);

        assert_eq!(brush.set_speed(f32::NAN), Err(MotorError::InvalidSpeed));
    }
}
