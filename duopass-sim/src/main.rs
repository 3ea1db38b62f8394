use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use duopass_core::state::PassDirection;
use duopass_sim::config::SensorFault;
use duopass_sim::{SimConfig, SimError, SimReport, Simulation};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Run the duopass pass controller against a simulated robot")]
struct Cli {
    /// TOML configuration file (defaults to the reference robot)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation step in ms
    #[arg(long)]
    tick_ms: Option<u32>,

    /// Stop after the first pass
    #[arg(long)]
    single_pass: bool,

    /// Inject a proximity sensor fault as SENSOR:FROM_MS:UNTIL_MS (sensor 1 or 2)
    #[arg(long, value_parser = parse_fault)]
    fault: Vec<SensorFault>,
}

fn parse_fault(arg: &str) -> Result<SensorFault, String> {
    let mut parts = arg.split(':');
    let (Some(sensor), Some(from), Some(until), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("expected SENSOR:FROM_MS:UNTIL_MS".into());
    };

    let side = match sensor {
        "1" => PassDirection::Forward,
        "2" => PassDirection::Backward,
        other => return Err(format!("unknown sensor {other}, expected 1 or 2")),
    };
    let from_ms = from.parse().map_err(|e| format!("invalid start time: {e}"))?;
    let until_ms = until.parse().map_err(|e| format!("invalid end time: {e}"))?;

    Ok(SensorFault {
        side,
        from_ms,
        until_ms,
    })
}

fn run(cli: Cli) -> Result<SimReport, SimError> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if let Some(tick_ms) = cli.tick_ms {
        config.run.tick_ms = tick_ms;
    }
    if cli.single_pass {
        config.controller.bidirectional = false;
    }
    config.run.sensor_faults.extend(cli.fault);

    let mut simulation = Simulation::new(config)?;
    Ok(simulation.run())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(report) => {
            for (index, pass) in report.passes.iter().enumerate() {
                info!(
                    pass = index + 1,
                    direction = ?pass.direction,
                    distance_mm = pass.distance_mm,
                    duration_ms = pass.duration_ms,
                    reason = pass.reason_name(),
                    "pass summary"
                );
            }
            info!(
                elapsed_ms = report.elapsed_ms,
                position_mm = report.final_position_mm,
                warnings = report.warnings,
                "simulation finished"
            );
            if report.finished() {
                ExitCode::SUCCESS
            } else {
                warn!("controller did not reach its terminal state");
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fault() {
        assert_eq!(
            parse_fault("2:3000:3500"),
            Ok(SensorFault {
                side: PassDirection::Backward,
                from_ms: 3000,
                until_ms: 3500,
            })
        );
        assert!(parse_fault("3:0:10").is_err());
        assert!(parse_fault("1:0").is_err());
        assert!(parse_fault("1:0:10:20").is_err());
        assert!(parse_fault("1:x:10").is_err());
    }
}
