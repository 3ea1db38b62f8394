//! Simulation loop

use std::sync::Arc;

use duopass_core::pass::{
    Drivetrain, PassController, PassHardware, PassSide, PassSummary, TickOutcome,
};
use duopass_core::state::{PassDirection, PassState};
use duopass_drivers::encoder::{EncoderConfig, PulseCounter, PulseEncoder};
use tracing::{debug, info, trace};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::plant::{Plant, SimBrush, SimDrive, SimLimit, SimProximity, SimValve, Wheel};
use crate::sink::TracingSink;

pub type SimEncoder = PulseEncoder<Arc<PulseCounter>>;

pub type SimController =
    PassController<SimDrive, SimBrush, SimEncoder, SimLimit, SimProximity, SimValve, TracingSink>;

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub passes: Vec<PassSummary>,
    pub final_state: PassState,
    /// Simulated time when the run ended (ms)
    pub elapsed_ms: u32,
    pub final_position_mm: f32,
    pub warnings: usize,
}

impl SimReport {
    /// Check if the controller reached its terminal state
    pub fn finished(&self) -> bool {
        self.final_state.is_terminal()
    }
}

/// Controller wired to a simulated robot
pub struct Simulation {
    config: SimConfig,
    plant: Plant,
    controller: SimController,
    now_ms: u32,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let plant = Plant::new(&config.plant, config.controller.mirror_right_motor);
        let encoder_config = EncoderConfig {
            pulses_per_rev: config.plant.pulses_per_rev,
            wheel_circumference_mm: config.plant.wheel_circumference_mm,
            sample_interval_ms: config.controller.control_interval_ms,
        };

        let side = |direction| PassSide {
            limit: plant.limit(direction),
            proximity: plant.proximity(direction),
            valve: plant.valve(direction),
        };
        let hardware = PassHardware {
            drivetrain: Drivetrain {
                left: plant.drive(Wheel::Left),
                right: plant.drive(Wheel::Right),
                left_encoder: PulseEncoder::new(plant.counter(Wheel::Left), encoder_config.clone()),
                right_encoder: PulseEncoder::new(plant.counter(Wheel::Right), encoder_config),
            },
            brush: plant.brush(),
            forward: side(PassDirection::Forward),
            backward: side(PassDirection::Backward),
        };

        let controller =
            PassController::new(config.controller.clone(), hardware, TracingSink::default())?;

        Ok(Self {
            config,
            plant,
            controller,
            now_ms: 0,
        })
    }

    pub fn plant(&self) -> &Plant {
        &self.plant
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    /// Run one controller tick, then advance the plant by one step
    pub fn step(&mut self) -> TickOutcome {
        let now = self.now_ms;

        for side in [PassDirection::Forward, PassDirection::Backward] {
            let faulted = self
                .config
                .run
                .sensor_faults
                .iter()
                .any(|fault| fault.side == side && fault.active_at(now));
            self.plant.set_sensor_fault(side, faulted);
        }

        let drivetrain = &mut self.controller.hardware_mut().drivetrain;
        drivetrain.left_encoder.sample(now);
        drivetrain.right_encoder.sample(now);

        let outcome = self.controller.tick(now);
        trace!(
            now_ms = now,
            position_mm = self.plant.position_mm(),
            ?outcome,
            "tick"
        );

        self.plant.step(self.config.run.tick_ms);
        self.now_ms = now.saturating_add(self.config.run.tick_ms);
        outcome
    }

    /// Step until the controller finishes or the time budget runs out
    pub fn run(&mut self) -> SimReport {
        info!(
            direction = ?self.controller.direction(),
            bidirectional = self.config.controller.bidirectional,
            "simulation started"
        );

        while !self.controller.is_finished() && self.now_ms < self.config.run.max_duration_ms {
            if let TickOutcome::PassComplete(summary) = self.step() {
                debug!(
                    position_mm = self.plant.position_mm(),
                    ?summary,
                    "pass complete"
                );
            }
        }

        let report = self.report();
        if !report.finished() {
            tracing::warn!(
                elapsed_ms = report.elapsed_ms,
                state = ?report.final_state,
                "time budget exhausted before the controller finished"
            );
        }
        report
    }

    pub fn report(&self) -> SimReport {
        let sink = self.controller.sink();
        SimReport {
            passes: sink.passes().to_vec(),
            final_state: self.controller.state(),
            elapsed_ms: self.now_ms,
            final_position_mm: self.plant.position_mm(),
            warnings: sink.warnings(),
        }
    }
}
