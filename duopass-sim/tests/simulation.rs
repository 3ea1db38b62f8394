//! End-to-end runs of the pass controller against the simulated robot

use std::path::Path;

use duopass_core::state::{PassDirection, PassState, StopReason};
use duopass_sim::config::SensorFault;
use duopass_sim::{SimConfig, SimError, Simulation};

fn simulation(config: SimConfig) -> Simulation {
    Simulation::new(config).unwrap()
}

#[test]
fn test_reference_run_two_passes() {
    let config = SimConfig::default();
    let threshold = config.controller.distance_threshold_mm;
    let mut sim = simulation(config);

    let report = sim.run();

    assert!(report.finished());
    assert_eq!(report.final_state, PassState::Idle);
    assert_eq!(report.passes.len(), 2);
    assert_eq!(report.passes[0].direction, PassDirection::Forward);
    assert_eq!(report.passes[1].direction, PassDirection::Backward);
    for pass in &report.passes {
        assert_eq!(pass.reason, StopReason::LimitSwitch);
        assert!(pass.distance_mm > threshold);
    }
    assert!(report.final_position_mm < 1.0);
    assert_eq!(report.warnings, 0);

    let plant = sim.plant();
    assert!(!plant.valve_open(PassDirection::Forward));
    assert!(!plant.valve_open(PassDirection::Backward));
    assert_eq!(plant.brush_speed(), 0.0);
}

#[test]
fn test_actuators_follow_work_zone() {
    let mut sim = simulation(SimConfig::default());

    let mut saw_wet_zone = false;
    while sim.plant().position_mm() < 1000.0 && sim.now_ms() < 60_000 {
        sim.step();
        let position = sim.plant().position_mm();
        // The encoder lags the plant by at most one tick
        if position < 150.0 {
            assert!(!sim.plant().valve_open(PassDirection::Forward));
            assert_eq!(sim.plant().brush_speed(), 0.0);
        }
        if position > 300.0 {
            assert!(sim.plant().valve_open(PassDirection::Forward));
            assert_eq!(sim.plant().brush_speed(), 1.0);
            saw_wet_zone = true;
        }
    }
    assert!(saw_wet_zone);
    assert!(!sim.plant().valve_open(PassDirection::Backward));
}

#[test]
fn test_single_pass() {
    let mut config = SimConfig::default();
    config.controller.bidirectional = false;
    let mut sim = simulation(config);

    let report = sim.run();

    assert_eq!(report.final_state, PassState::Idle);
    assert_eq!(report.passes.len(), 1);
    assert!(report.final_position_mm > 1990.0);
}

#[test]
fn test_sensor_fault_pauses_drive() {
    let mut config = SimConfig::default();
    config.run.sensor_faults.push(SensorFault {
        side: PassDirection::Backward,
        from_ms: 3000,
        until_ms: 3500,
    });
    let mut sim = simulation(config);

    while sim.now_ms() <= 3200 {
        sim.step();
    }
    assert!(sim.controller().drive_command().is_stopped());
    let paused_at = sim.plant().position_mm();

    while sim.now_ms() < 3500 {
        sim.step();
    }
    assert!(sim.plant().position_mm() - paused_at < 10.0);

    let report = sim.run();
    assert!(report.finished());
    assert_eq!(report.passes.len(), 2);
    // One warning per interlocked tick
    assert!(report.warnings >= 50);
}

#[test]
fn test_proximity_ends_passes() {
    let mut config = SimConfig::default();
    config.plant.proximity_range_mm = 30.0;
    let mut sim = simulation(config);

    let report = sim.run();

    assert_eq!(report.passes.len(), 2);
    for pass in &report.passes {
        assert_eq!(pass.reason, StopReason::Proximity);
        assert!(pass.distance_mm < 1985.0);
    }
    assert!(report.final_position_mm > 0.0);
}

#[test]
fn test_travel_guard_on_long_track() {
    let mut config = SimConfig::default();
    config.plant.track_length_mm = 5000.0;
    let mut sim = simulation(config);

    let report = sim.run();

    assert_eq!(report.final_state, PassState::Idle);
    assert_eq!(report.passes.len(), 1);
    assert_eq!(report.passes[0].reason, StopReason::TravelLimit);
    assert!(report.warnings >= 1);
}

#[test]
fn test_invalid_config_refused() {
    let mut config = SimConfig::default();
    config.controller.max_pass_distance_mm = 100.0;
    assert!(matches!(
        Simulation::new(config),
        Err(SimError::Controller(_))
    ));

    let mut config = SimConfig::default();
    config.run.tick_ms = 0;
    assert!(matches!(Simulation::new(config), Err(SimError::Run(_))));
}

#[test]
fn test_bundled_config_runs() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("sim.toml");
    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.run.sensor_faults.len(), 1);

    let report = simulation(config).run();
    assert!(report.finished());
    assert_eq!(report.passes.len(), 2);
    assert!(report.warnings > 0);
}
