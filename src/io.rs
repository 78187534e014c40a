use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Vector2;
use tracing::{info, warn};

use crate::domain::population::VelocityField;
use crate::error::SolverError;

fn create_with_parents(path: &Path) -> Result<File, SolverError> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() {
            fs::create_dir_all(parent_dir).map_err(|e| {
                SolverError::OutputWriteFailure(format!("{}: {}", parent_dir.display(), e))
            })?;
        }
    }
    File::create(path)
        .map_err(|e| SolverError::OutputWriteFailure(format!("{}: {}", path.display(), e)))
}

/// Per-step force log: one `step Fx Fy` line per time step.
#[derive(Debug)]
pub struct ForceLogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl ForceLogWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let path = path.as_ref().to_path_buf();
        let file = create_with_parents(&path)?;
        info!("Writing force log to {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn record(&mut self, step: usize, force: &Vector2<f64>) -> Result<(), SolverError> {
        writeln!(self.writer, "{} {} {}", step, force.x, force.y).map_err(|e| {
            SolverError::OutputWriteFailure(format!("{} (step {}): {}", self.path.display(), step, e))
        })?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn finish(mut self) -> Result<usize, SolverError> {
        self.writer
            .flush()
            .map_err(|e| SolverError::OutputWriteFailure(format!("{}: {}", self.path.display(), e)))?;
        Ok(self.lines)
    }
}

/// Running record of the per-step force, used for the time average.
#[derive(Debug, Clone, Default)]
pub struct ForceHistory {
    sum: Vector2<f64>,
    last: Option<Vector2<f64>>,
    count: usize,
}

impl ForceHistory {
    pub fn push(&mut self, force: &Vector2<f64>) {
        self.sum += force;
        self.last = Some(*force);
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> Option<Vector2<f64>> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn last(&self) -> Option<Vector2<f64>> {
        self.last
    }
}

/// Writes every `stride`-th cell of `field` as `ix iy 3*Ux/u_fan 3*Uy/u_fan`,
/// with a blank line after each `ix` column.
///
/// With `u_fan == 0` the raw velocity is written instead.
pub fn write_velocity_snapshot<P: AsRef<Path>>(
    path: P,
    field: &VelocityField,
    stride: usize,
    u_fan: f64,
) -> Result<usize, SolverError> {
    let path = path.as_ref();
    let stride = stride.max(1);
    let scale = if u_fan != 0.0 {
        3.0 / u_fan
    } else {
        warn!("Fan velocity is zero; writing unnormalised velocities");
        1.0
    };

    let output_start = std::time::Instant::now();
    let file = create_with_parents(path)?;
    let mut writer = BufWriter::new(file);
    let mut samples = 0;
    let io_err = |e: std::io::Error| SolverError::OutputWriteFailure(format!("{}: {}", path.display(), e));

    for ix in (0..field.ux.nrows()).step_by(stride) {
        for iy in (0..field.ux.ncols()).step_by(stride) {
            writeln!(
                writer,
                "{} {} {} {}",
                ix,
                iy,
                scale * field.ux[(ix, iy)],
                scale * field.uy[(ix, iy)]
            )
            .map_err(io_err)?;
            samples += 1;
        }
        writeln!(writer).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    info!(
        "Velocity snapshot ({} samples) written to {} in {:.2}ms",
        samples,
        path.display(),
        output_start.elapsed().as_millis()
    );
    Ok(samples)
}
