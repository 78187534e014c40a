use rayon::prelude::*;

use crate::boundary::obstacle::RectObstacle;
use crate::domain::d2q9::{self, Q};
use crate::domain::population::PopulationField;

/// Forcing class of a cell. Checks run in declaration order and the first
/// match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRegion {
    /// `ix == 0` at or above the obstacle's bottom edge: forced to `(u_fan, 0)`.
    Inlet,
    /// Strict interior of the obstacle: forced to rest.
    Obstacle,
    /// Band below `bottom_edge - floor_margin`: forced to rest.
    Floor,
    /// Left to collision alone.
    Fluid,
}

/// Where and how post-collision populations get overwritten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryForcing {
    pub u_fan: f64,
    pub obstacle: RectObstacle,
    pub floor_margin: f64,
}

impl BoundaryForcing {
    pub fn new(u_fan: f64, obstacle: RectObstacle, floor_margin: f64) -> Self {
        Self {
            u_fan,
            obstacle,
            floor_margin,
        }
    }

    pub fn classify(&self, ix: usize, iy: usize) -> CellRegion {
        let x = ix as f64;
        let y = iy as f64;
        if ix == 0 && y >= self.obstacle.bottom() {
            CellRegion::Inlet
        } else if self.obstacle.contains_strictly(x, y) {
            CellRegion::Obstacle
        } else if y < self.obstacle.bottom() - self.floor_margin {
            CellRegion::Floor
        } else {
            CellRegion::Fluid
        }
    }

    /// Velocity a region is forced toward, if any.
    pub fn target_velocity(&self, region: CellRegion) -> Option<(f64, f64)> {
        match region {
            CellRegion::Inlet => Some((self.u_fan, 0.0)),
            CellRegion::Obstacle | CellRegion::Floor => Some((0.0, 0.0)),
            CellRegion::Fluid => None,
        }
    }

    /// Replaces the next buffer of every forced cell with the equilibrium at
    /// the cell's pre-collision density and the region's target velocity.
    pub fn impose(&self, field: &mut PopulationField) {
        let grid = *field.grid();
        let (current, next) = field.collision_buffers();
        next.par_chunks_exact_mut(Q)
            .zip(current.par_chunks_exact(Q))
            .enumerate()
            .for_each(|(cell, (f_next, f_cur))| {
                let (ix, iy) = grid.coords(cell);
                if let Some((ux, uy)) = self.target_velocity(self.classify(ix, iy)) {
                    let rho0: f64 = f_cur.iter().sum();
                    for (i, fi) in f_next.iter_mut().enumerate() {
                        *fi = d2q9::equilibrium(rho0, ux, uy, i);
                    }
                }
            });
    }

    /// Number of cells in each forced region, as `(inlet, obstacle, floor)`.
    pub fn region_counts(&self, lx: usize, ly: usize) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for ix in 0..lx {
            for iy in 0..ly {
                match self.classify(ix, iy) {
                    CellRegion::Inlet => counts.0 += 1,
                    CellRegion::Obstacle => counts.1 += 1,
                    CellRegion::Floor => counts.2 += 1,
                    CellRegion::Fluid => {}
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid2d::{Grid2D, GridDimensions2D};
    use crate::domain::population::Buffer;
    use approx::assert_relative_eq;

    fn forcing() -> BoundaryForcing {
        // Obstacle spans x in (4, 10), y in (12, 16); floor below y = 2.
        BoundaryForcing::new(0.1, RectObstacle::new(6.0, 4.0, 10.0, 12.0), 10.0)
    }

    #[test]
    fn test_classify_regions() {
        let bc = forcing();
        assert_eq!(bc.classify(0, 12), CellRegion::Inlet);
        assert_eq!(bc.classify(0, 19), CellRegion::Inlet);
        assert_eq!(bc.classify(0, 11), CellRegion::Fluid);
        assert_eq!(bc.classify(5, 13), CellRegion::Obstacle);
        assert_eq!(bc.classify(4, 13), CellRegion::Fluid);
        assert_eq!(bc.classify(5, 12), CellRegion::Fluid);
        assert_eq!(bc.classify(7, 1), CellRegion::Floor);
        assert_eq!(bc.classify(7, 2), CellRegion::Fluid);
        // The inlet column only starts at the bottom edge.
        assert_eq!(bc.classify(0, 0), CellRegion::Floor);
    }

    #[test]
    fn test_inlet_takes_precedence_over_obstacle() {
        let bc = BoundaryForcing::new(0.1, RectObstacle::new(6.0, 4.0, 3.0, 12.0), 10.0);
        assert!(bc.obstacle.contains_strictly(0.0, 13.0));
        assert_eq!(bc.classify(0, 13), CellRegion::Inlet);
        assert_eq!(bc.classify(1, 13), CellRegion::Obstacle);
    }

    #[test]
    fn test_region_counts() {
        let bc = forcing();
        let (inlet, obstacle, floor) = bc.region_counts(20, 20);
        assert_eq!(inlet, 8); // iy = 12..=19
        assert_eq!(obstacle, 5 * 3); // ix 5..=9, iy 13..=15
        assert_eq!(floor, 20 * 2); // iy 0..=1
    }

    #[test]
    fn test_impose_overwrites_only_forced_cells() {
        let grid = Grid2D::new(GridDimensions2D(20, 20)).unwrap();
        let mut field = PopulationField::new(grid);
        field.initialize(1.1, 0.03, 0.01);
        let marker = -7.0;
        field.next_mut().fill(marker);

        let bc = forcing();
        bc.impose(&mut field);

        // Inlet: pre-collision density, fan velocity.
        let (rho, ux, uy) = field.moments(0, 15, Buffer::Next);
        assert_relative_eq!(rho, 1.1, epsilon = 1e-12);
        assert_relative_eq!(ux, 0.1, epsilon = 1e-12);
        assert_relative_eq!(uy, 0.0, epsilon = 1e-12);

        // Obstacle and floor: at rest.
        for &(ix, iy) in &[(6, 14), (12, 0)] {
            let (rho, ux, uy) = field.moments(ix, iy, Buffer::Next);
            assert_relative_eq!(rho, 1.1, epsilon = 1e-12);
            assert_relative_eq!(ux, 0.0, epsilon = 1e-12);
            assert_relative_eq!(uy, 0.0, epsilon = 1e-12);
        }

        // Fluid cell untouched.
        let idx = grid.index(12, 8, 3);
        assert_eq!(field.next()[idx], marker);
    }
}
