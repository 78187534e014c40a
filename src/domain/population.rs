use nalgebra::DMatrix;

use crate::domain::d2q9::{self, Q};
use crate::domain::grid2d::Grid2D;

/// Selects one of the two population buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    /// Post-streaming, pre-collision state.
    Current,
    /// Post-collision, pre-streaming state.
    Next,
}

/// Cell-centred macroscopic velocity, `lx x ly`.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityField {
    pub ux: DMatrix<f64>,
    pub uy: DMatrix<f64>,
}

/// Double-buffered D2Q9 distribution functions.
#[derive(Debug, Clone)]
pub struct PopulationField {
    grid: Grid2D,
    current: Vec<f64>,
    next: Vec<f64>,
}

impl PopulationField {
    pub fn new(grid: Grid2D) -> Self {
        let len = grid.buffer_len();
        Self {
            grid,
            current: vec![0.0; len],
            next: vec![0.0; len],
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    #[inline]
    fn buffer(&self, which: Buffer) -> &[f64] {
        match which {
            Buffer::Current => &self.current,
            Buffer::Next => &self.next,
        }
    }

    pub fn current(&self) -> &[f64] {
        &self.current
    }

    pub fn next(&self) -> &[f64] {
        &self.next
    }

    /// Read access to `current` alongside write access to `next`.
    pub fn collision_buffers(&mut self) -> (&[f64], &mut [f64]) {
        (&self.current, &mut self.next)
    }

    /// Read access to `next` alongside write access to `current`.
    pub fn streaming_buffers(&mut self) -> (&[f64], &mut [f64]) {
        (&self.next, &mut self.current)
    }

    #[cfg(test)]
    pub fn next_mut(&mut self) -> &mut [f64] {
        &mut self.next
    }

    #[inline]
    fn cell_slice(&self, ix: usize, iy: usize, which: Buffer) -> &[f64] {
        let start = self.grid.index(ix, iy, 0);
        &self.buffer(which)[start..start + Q]
    }

    pub fn rho(&self, ix: usize, iy: usize, which: Buffer) -> f64 {
        self.cell_slice(ix, iy, which).iter().sum()
    }

    pub fn jx(&self, ix: usize, iy: usize, which: Buffer) -> f64 {
        let f = self.cell_slice(ix, iy, which);
        (0..Q).map(|i| d2q9::VELOCITIES[i][0] as f64 * f[i]).sum()
    }

    pub fn jy(&self, ix: usize, iy: usize, which: Buffer) -> f64 {
        let f = self.cell_slice(ix, iy, which);
        (0..Q).map(|i| d2q9::VELOCITIES[i][1] as f64 * f[i]).sum()
    }

    /// `(rho, ux, uy)` at a cell. Not guarded against `rho == 0`.
    pub fn moments(&self, ix: usize, iy: usize, which: Buffer) -> (f64, f64, f64) {
        moments(self.cell_slice(ix, iy, which))
    }

    pub fn velocity(&self, ix: usize, iy: usize, which: Buffer) -> (f64, f64) {
        let (_, ux, uy) = self.moments(ix, iy, which);
        (ux, uy)
    }

    #[inline]
    pub fn equilibrium(&self, rho0: f64, ux0: f64, uy0: f64, i: usize) -> f64 {
        d2q9::equilibrium(rho0, ux0, uy0, i)
    }

    /// Sets every cell of the current buffer to the equilibrium of a uniform state.
    pub fn initialize(&mut self, rho0: f64, ux0: f64, uy0: f64) {
        self.initialize_with(|_, _| (rho0, ux0, uy0));
    }

    /// Sets every cell of the current buffer to the equilibrium of `state(ix, iy)`.
    pub fn initialize_with<F>(&mut self, mut state: F)
    where
        F: FnMut(usize, usize) -> (f64, f64, f64),
    {
        let grid = self.grid;
        for (cell, f) in self.current.chunks_exact_mut(Q).enumerate() {
            let (ix, iy) = grid.coords(cell);
            let (rho0, ux0, uy0) = state(ix, iy);
            for (i, fi) in f.iter_mut().enumerate() {
                *fi = d2q9::equilibrium(rho0, ux0, uy0, i);
            }
        }
    }

    /// Sum of the density over all cells of a buffer.
    pub fn total_mass(&self, which: Buffer) -> f64 {
        self.buffer(which).iter().sum()
    }

    /// Velocity of every cell of a buffer.
    pub fn velocity_field(&self, which: Buffer) -> VelocityField {
        let (lx, ly) = (self.grid.lx(), self.grid.ly());
        let mut ux = DMatrix::<f64>::zeros(lx, ly);
        let mut uy = DMatrix::<f64>::zeros(lx, ly);
        for ix in 0..lx {
            for iy in 0..ly {
                let (u, v) = self.velocity(ix, iy, which);
                ux[(ix, iy)] = u;
                uy[(ix, iy)] = v;
            }
        }
        VelocityField { ux, uy }
    }

    /// First cell of the current buffer with non-positive or non-finite
    /// density, or non-finite velocity.
    pub fn find_unphysical_cell(&self) -> Option<(usize, usize, String)> {
        self.current
            .chunks_exact(Q)
            .enumerate()
            .find_map(|(cell, f)| {
                let (rho, ux, uy) = moments(f);
                let (ix, iy) = self.grid.coords(cell);
                if !rho.is_finite() || rho <= 0.0 {
                    Some((ix, iy, format!("density {} at cell ({}, {})", rho, ix, iy)))
                } else if !ux.is_finite() || !uy.is_finite() {
                    Some((ix, iy, format!("velocity ({}, {}) at cell ({}, {})", ux, uy, ix, iy)))
                } else {
                    None
                }
            })
    }
}

/// `(rho, ux, uy)` of one cell's populations.
#[inline]
pub fn moments(f: &[f64]) -> (f64, f64, f64) {
    let mut rho = 0.0;
    let mut jx = 0.0;
    let mut jy = 0.0;
    for (i, &fi) in f.iter().enumerate().take(Q) {
        let [vx, vy] = d2q9::VELOCITIES[i];
        rho += fi;
        jx += vx as f64 * fi;
        jy += vy as f64 * fi;
    }
    (rho, jx / rho, jy / rho)
}
