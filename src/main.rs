#![allow(dead_code)]
//! Two-dimensional lattice-Boltzmann (D2Q9, BGK) flow past a rectangular
//! obstacle, with the aerodynamic force recovered by integrating the
//! reconstructed Cauchy stress over the obstacle's surface.

use std::time::Instant;

use tracing::{error, info, info_span};

use config::SimulationConfig;
use error::SolverError;
use io::{write_velocity_snapshot, ForceHistory, ForceLogWriter};
use json_io::{write_run_summary, RunSummary};
use solver::Solver;

mod boundary;
mod config;
mod domain;
mod error;
mod io;
mod json_io;
mod numerical;
mod solver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    // Optional single argument: path to a JSON configuration file.
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };

    match run_simulation(&config) {
        Ok(summary) => {
            info!(
                "Done: {} steps, force log in {}, velocity field in {}",
                summary.steps_completed, config.force_log_path, config.velocity_path
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Simulation aborted");
            Err(e.into())
        }
    }
}

/// Runs a full simulation: the force log is written as the run goes, the
/// velocity snapshot and optional JSON summary at the end.
pub fn run_simulation(config: &SimulationConfig) -> Result<RunSummary, SolverError> {
    let _span = info_span!("run_simulation", steps = config.steps).entered();
    let start = Instant::now();

    let mut solver = Solver::new(config)?;
    let mut log = ForceLogWriter::create(&config.force_log_path)?;
    let mut history = ForceHistory::default();

    solver.run(config.steps, |step, force| {
        history.push(force);
        log.record(step, force)
    })?;
    let lines = log.finish()?;
    info!("Force log complete: {} lines", lines);

    write_velocity_snapshot(
        &config.velocity_path,
        &solver.velocity_snapshot(),
        config.snapshot_stride,
        config.u_fan,
    )?;

    let summary = RunSummary::new(config, &history, start.elapsed().as_secs_f64());
    if let Some(mean) = summary.mean_force {
        info!("Mean force: Fx={:.6e}, Fy={:.6e}", mean[0], mean[1]);
    }
    if let Some(path) = &config.summary_path {
        write_run_summary(path, &summary)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::obstacle::RectObstacle;
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> SimulationConfig {
        SimulationConfig {
            steps: 10,
            force_log_path: dir.join("FxFy.dat").to_string_lossy().into_owned(),
            velocity_path: dir.join("wind.dat").to_string_lossy().into_owned(),
            ..SimulationConfig::default()
        }
    }

    fn parse_force_log(path: &Path) -> Vec<(usize, f64, f64)> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                let fields: Vec<&str> = line.split_whitespace().collect();
                assert_eq!(fields.len(), 3, "bad line {:?}", line);
                (
                    fields[0].parse().unwrap(),
                    fields[1].parse().unwrap(),
                    fields[2].parse().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_reference_geometry_ten_steps() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = config_in(dir.path());
        let summary = run_simulation(&config)?;
        assert_eq!(summary.steps_completed, 10);

        let rows = parse_force_log(Path::new(&config.force_log_path));
        assert_eq!(rows.len(), 10);
        for (k, (step, fx, fy)) in rows.iter().enumerate() {
            assert_eq!(*step, k);
            assert!(fx.is_finite() && fy.is_finite());
        }

        // 400 / 5 columns of 100 / 5 samples each.
        let wind = fs::read_to_string(&config.velocity_path)?;
        let samples = wind.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(samples, 80 * 20);
        assert_eq!(wind.matches("\n\n").count(), 80);
        Ok(())
    }

    #[test]
    fn test_still_air_without_obstacle_has_zero_force() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = SimulationConfig {
            lx: 80,
            ly: 60,
            u_fan: 0.0,
            obstacle: RectObstacle::new(0.0, 0.0, 40.0, 30.0),
            ..config_in(dir.path())
        };
        run_simulation(&config)?;
        for (_, fx, fy) in parse_force_log(Path::new(&config.force_log_path)) {
            assert_eq!(fx, 0.0);
            assert_eq!(fy, 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_summary_written_when_requested() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let summary_path = dir.path().join("summary.json");
        let config = SimulationConfig {
            lx: 60,
            ly: 40,
            steps: 3,
            obstacle: RectObstacle::new(10.0, 4.0, 30.0, 20.0),
            summary_path: Some(summary_path.to_string_lossy().into_owned()),
            ..config_in(dir.path())
        };
        run_simulation(&config)?;
        let output: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary_path)?)?;
        assert_eq!(output["steps_completed"], 3);
        assert!(output["mean_force"][0].as_f64().unwrap().is_finite());
        Ok(())
    }

    #[test]
    fn test_invalid_geometry_rejected_before_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = SimulationConfig {
            obstacle: RectObstacle::new(90.0, 10.0, 450.0, 50.0),
            ..config_in(dir.path())
        };
        assert!(matches!(run_simulation(&config), Err(SolverError::InvalidGeometry(_))));
        assert!(!Path::new(&config.force_log_path).exists());
        Ok(())
    }

    #[test]
    fn test_unwritable_force_log_aborts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x")?;
        let config = SimulationConfig {
            lx: 40,
            ly: 40,
            obstacle: RectObstacle::new(6.0, 4.0, 20.0, 20.0),
            force_log_path: blocker.join("FxFy.dat").to_string_lossy().into_owned(),
            ..config_in(dir.path())
        };
        assert!(matches!(run_simulation(&config), Err(SolverError::OutputWriteFailure(_))));
        Ok(())
    }

    #[test]
    fn test_zero_steps_writes_initial_state() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = SimulationConfig {
            lx: 20,
            ly: 20,
            steps: 0,
            obstacle: RectObstacle::new(4.0, 2.0, 12.0, 10.0),
            ..config_in(dir.path())
        };
        let summary = run_simulation(&config)?;
        assert_eq!(summary.steps_completed, 0);
        assert!(parse_force_log(Path::new(&config.force_log_path)).is_empty());

        // Initial uniform state: Ux = u_fan everywhere, so the scaled value is 3.
        let wind = fs::read_to_string(&config.velocity_path)?;
        let rows: Vec<Vec<f64>> = wind
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 4 * 4);
        for row in rows {
            assert_relative_eq!(row[2], 3.0, epsilon = 1e-12);
            assert_relative_eq!(row[3], 0.0, epsilon = 1e-12);
        }
        Ok(())
    }
}
