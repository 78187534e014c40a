use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::error::SolverError;
use crate::io::ForceHistory;

/// End-of-run record: the configuration plus the time-averaged force.
#[derive(Serialize, Debug, Clone)]
pub struct RunSummary {
    pub config: SimulationConfig,
    pub steps_completed: usize,
    pub mean_force: Option<[f64; 2]>,
    pub last_force: Option<[f64; 2]>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn new(config: &SimulationConfig, history: &ForceHistory, elapsed_secs: f64) -> Self {
        Self {
            config: config.clone(),
            steps_completed: history.len(),
            mean_force: history.mean().map(|f| [f.x, f.y]),
            last_force: history.last().map(|f| [f.x, f.y]),
            elapsed_secs,
        }
    }
}

pub fn write_run_summary<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<(), SolverError> {
    let path = path.as_ref();
    info!("Writing run summary to JSON file: {}...", path.display());
    let output_start = Instant::now();

    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let json_string = serde_json::to_string_pretty(summary)
        .map_err(|e| SolverError::OutputWriteFailure(format!("Failed to serialize summary: {}", e)))?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(json_string.as_bytes())?;
    writer.flush()?;

    info!("JSON output finished in {:.2}ms", output_start.elapsed().as_millis());
    Ok(())
}
