pub mod collision;
pub mod streaming;

use nalgebra::Vector2;
use tracing::{debug, info, info_span, warn};

use crate::boundary::forcing::BoundaryForcing;
use crate::config::SimulationConfig;
use crate::domain::grid2d::Grid2D;
use crate::domain::population::{Buffer, PopulationField, VelocityField};
use crate::error::SolverError;
use crate::numerical::force::force_on_obstacle;

use collision::collide;
use streaming::stream;

/// D2Q9 BGK solver with inlet/obstacle forcing and surface force estimation.
#[derive(Debug)]
pub struct Solver {
    pub grid: Grid2D,
    pub field: PopulationField,
    pub tau: f64,
    pub nu: f64,
    pub dt: f64,
    pub segments: usize,
    pub forcing: BoundaryForcing,
    pub divergence_check: bool,
    /// Number of completed steps.
    pub step_index: usize,
}

impl Solver {
    /// Builds a solver from a validated configuration, starting from the
    /// uniform equilibrium `(rho0, u_fan, 0)`.
    pub fn new(config: &SimulationConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let grid = config.grid()?;
        let mut field = PopulationField::new(grid);
        field.initialize(config.rho0, config.u_fan, 0.0);

        let forcing = BoundaryForcing::new(config.u_fan, config.obstacle, config.floor_margin);
        let (inlet, solid, floor) = forcing.region_counts(grid.lx(), grid.ly());
        info!(
            lx = grid.lx(),
            ly = grid.ly(),
            tau = config.tau,
            nu = config.viscosity(),
            inlet_cells = inlet,
            obstacle_cells = solid,
            floor_cells = floor,
            "Solver initialised"
        );

        Ok(Self {
            grid,
            field,
            tau: config.tau,
            nu: config.viscosity(),
            dt: config.dt,
            segments: config.segments,
            forcing,
            divergence_check: config.divergence_check,
            step_index: 0,
        })
    }

    /// Collision, boundary forcing and streaming, without the force pass.
    pub fn advance(&mut self) {
        collide(&mut self.field, self.tau);
        self.forcing.impose(&mut self.field);
        stream(&mut self.field);
    }

    /// Net force on the obstacle for the current state.
    pub fn force(&self) -> Vector2<f64> {
        force_on_obstacle(&self.field, &self.forcing.obstacle, self.segments, self.nu, self.dt)
    }

    /// Performs one time step and returns the force on the obstacle after it.
    pub fn step(&mut self) -> Result<Vector2<f64>, SolverError> {
        self.advance();
        let step = self.step_index;
        self.step_index += 1;

        if self.divergence_check {
            if let Some((_, _, reason)) = self.field.find_unphysical_cell() {
                return Err(SolverError::DivergedSimulation { step, reason });
            }
        }

        let force = self.force();
        if self.divergence_check && !(force.x.is_finite() && force.y.is_finite()) {
            return Err(SolverError::DivergedSimulation {
                step,
                reason: format!("non-finite force ({}, {})", force.x, force.y),
            });
        }
        Ok(force)
    }

    /// Runs `num_steps` steps, handing each step index and force to `on_step`.
    pub fn run<F>(&mut self, num_steps: usize, mut on_step: F) -> Result<(), SolverError>
    where
        F: FnMut(usize, &Vector2<f64>) -> Result<(), SolverError>,
    {
        let run_span = info_span!("simulation_run", num_steps = num_steps).entered();
        info!("Starting simulation with {} steps", num_steps);

        let start_time = std::time::Instant::now();
        let report_every = (num_steps / 10).max(1);

        for _ in 0..num_steps {
            let step_start = std::time::Instant::now();
            let step = self.step_index;
            let force = match self.step() {
                Ok(force) => force,
                Err(e) => {
                    warn!(step, error = %e, "Simulation step failed");
                    return Err(e);
                }
            };
            on_step(step, &force)?;

            debug!(
                step,
                fx = force.x,
                fy = force.y,
                elapsed_us = step_start.elapsed().as_micros() as u64,
                "step complete"
            );
            if (step + 1) % report_every == 0 {
                info!("Step {}: Fx={:.6e}, Fy={:.6e}", step + 1, force.x, force.y);
            }
        }

        info!(
            "Simulation finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );
        drop(run_span);
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.field.total_mass(Buffer::Current)
    }

    /// Velocity of every cell from the post-collision buffer of the last step.
    /// Before the first step that buffer is still empty, so the initial state
    /// is read instead.
    pub fn velocity_snapshot(&self) -> VelocityField {
        if self.step_index == 0 {
            self.field.velocity_field(Buffer::Current)
        } else {
            self.field.velocity_field(Buffer::Next)
        }
    }
}
