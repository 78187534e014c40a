use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::boundary::obstacle::RectObstacle;
use crate::domain::grid2d::{Grid2D, GridDimensions2D};
use crate::error::SolverError;

/// Immutable run parameters. Every field has a default, so a JSON file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub lx: usize,
    pub ly: usize,
    /// BGK relaxation time.
    pub tau: f64,
    /// Initial uniform density.
    pub rho0: f64,
    /// Inlet ("fan") velocity, also the initial x-velocity.
    pub u_fan: f64,
    pub obstacle: RectObstacle,
    /// Segments per obstacle edge for force integration.
    pub segments: usize,
    pub steps: usize,
    pub dt: f64,
    /// Cells below `obstacle.bottom_edge - floor_margin` are held at rest.
    pub floor_margin: f64,
    /// Sampling stride of the velocity snapshot.
    pub snapshot_stride: usize,
    pub force_log_path: String,
    pub velocity_path: String,
    pub summary_path: Option<String>,
    /// Abort with `DivergedSimulation` on non-physical state.
    pub divergence_check: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let lx = 400;
        let width = 90.0;
        Self {
            lx,
            ly: 100,
            tau: 0.8,
            rho0: 1.0,
            u_fan: 0.139,
            obstacle: RectObstacle::new(width, 10.0, (lx / 4) as f64 + width, 50.0),
            segments: 36,
            steps: 3000,
            dt: 1.0,
            floor_margin: 10.0,
            snapshot_stride: 5,
            force_log_path: "FxFy.dat".to_string(),
            velocity_path: "wind.dat".to_string(),
            summary_path: None,
            divergence_check: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SolverError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| SolverError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Kinematic viscosity `nu = (tau - 1/2) / 3`.
    pub fn viscosity(&self) -> f64 {
        (self.tau - 0.5) / 3.0
    }

    pub fn grid(&self) -> Result<Grid2D, SolverError> {
        Ok(Grid2D::new(GridDimensions2D(self.lx, self.ly))?)
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        let grid = self.grid()?;
        if !self.tau.is_finite() || self.tau <= 0.5 {
            return Err(SolverError::InvalidParameter(format!(
                "Relaxation time tau must be finite and greater than 0.5, got {}",
                self.tau
            )));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SolverError::InvalidParameter(format!(
                "Time step dt must be positive, got {}",
                self.dt
            )));
        }
        if !self.rho0.is_finite() || self.rho0 <= 0.0 {
            return Err(SolverError::InvalidParameter(format!(
                "Initial density must be positive, got {}",
                self.rho0
            )));
        }
        if !self.u_fan.is_finite() || !self.floor_margin.is_finite() {
            return Err(SolverError::InvalidParameter(
                "Fan velocity and floor margin must be finite".to_string(),
            ));
        }
        if self.segments == 0 {
            return Err(SolverError::InvalidParameter(
                "Segment count must be at least 1".to_string(),
            ));
        }
        if self.snapshot_stride == 0 {
            return Err(SolverError::InvalidParameter(
                "Snapshot stride must be at least 1".to_string(),
            ));
        }
        self.obstacle.validate(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_matches_reference_run() {
        let config = SimulationConfig::default();
        assert_eq!((config.lx, config.ly), (400, 100));
        assert_eq!(config.obstacle, RectObstacle::new(90.0, 10.0, 190.0, 50.0));
        assert_eq!(config.segments, 36);
        assert_eq!(config.steps, 3000);
        assert_relative_eq!(config.viscosity(), 0.1, epsilon = 1e-15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let base = SimulationConfig::default();

        let mut c = base.clone();
        c.tau = 0.5;
        assert!(matches!(c.validate(), Err(SolverError::InvalidParameter(_))));

        let mut c = base.clone();
        c.dt = 0.0;
        assert!(matches!(c.validate(), Err(SolverError::InvalidParameter(_))));

        let mut c = base.clone();
        c.segments = 0;
        assert!(matches!(c.validate(), Err(SolverError::InvalidParameter(_))));

        let mut c = base.clone();
        c.lx = 0;
        assert!(matches!(c.validate(), Err(SolverError::Grid(_))));

        let mut c = base.clone();
        c.obstacle.width = -5.0;
        assert!(matches!(c.validate(), Err(SolverError::InvalidGeometry(_))));

        let mut c = base;
        c.obstacle.bottom_edge = 95.0;
        assert!(matches!(c.validate(), Err(SolverError::InvalidGeometry(_))));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{ "steps": 10, "u_fan": 0.05, "obstacle": { "width": 20.0, "height": 4.0, "right_edge": 60.0, "bottom_edge": 30.0 } }"#,
        )?;
        let config = SimulationConfig::from_json_file(&path)?;
        assert_eq!(config.steps, 10);
        assert_relative_eq!(config.u_fan, 0.05);
        assert_eq!(config.obstacle.right_edge, 60.0);
        assert_eq!(config.lx, 400);
        assert_eq!(config.force_log_path, "FxFy.dat");
        Ok(())
    }

    #[test]
    fn test_missing_or_malformed_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            SimulationConfig::from_json_file(&missing),
            Err(SolverError::ConfigRead(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ steps: ")?;
        assert!(matches!(
            SimulationConfig::from_json_file(&bad),
            Err(SolverError::ConfigRead(_))
        ));
        Ok(())
    }
}
