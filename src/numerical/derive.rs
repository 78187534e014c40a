use nalgebra::Matrix2;

use crate::domain::d2q9::{self, Q};
use crate::domain::population::{Buffer, PopulationField};

/// Velocity gradient at a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityGradient {
    pub dux_dx: f64,
    pub dux_dy: f64,
    pub duy_dx: f64,
    pub duy_dy: f64,
}

/// Estimates the velocity gradient at `(ix, iy)` from the post-streaming
/// velocities of its eight neighbours.
///
/// Uses the lattice first-moment identity
///
/// \[
/// \partial_\beta u_\alpha \approx \frac{3}{\Delta t} \sum_i w_i \, v_{i\beta} \, u_\alpha(x + v_i),
/// \]
///
/// which follows from `sum_i w_i v_ia v_ib = delta_ab / 3`. Neighbours wrap
/// periodically.
pub fn velocity_gradient(field: &PopulationField, ix: usize, iy: usize, dt: f64) -> VelocityGradient {
    let grid = field.grid();
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_yx = 0.0;
    let mut sum_yy = 0.0;

    for i in 0..Q {
        let (nx, ny) = grid.neighbor(ix, iy, i);
        let (ux, uy) = field.velocity(nx, ny, Buffer::Current);
        let (vx, vy) = d2q9::velocity(i);
        let w = d2q9::WEIGHTS[i];
        sum_xx += w * vx * ux;
        sum_xy += w * vy * ux;
        sum_yx += w * vx * uy;
        sum_yy += w * vy * uy;
    }

    let scale = 3.0 / dt;
    VelocityGradient {
        dux_dx: scale * sum_xx,
        dux_dy: scale * sum_xy,
        duy_dx: scale * sum_yx,
        duy_dy: scale * sum_yy,
    }
}

/// Lattice pressure `p = rho c_s^2` with `c_s^2 = 1/3`.
#[inline]
pub fn pressure(rho: f64) -> f64 {
    rho / 3.0
}

/// Newtonian stress `sigma = -p I + eta (grad u + grad u^T)`.
///
/// The returned matrix is symmetric: `sigma_xy == sigma_yx`.
pub fn newtonian_stress(rho: f64, eta: f64, grad: &VelocityGradient) -> Matrix2<f64> {
    let p = pressure(rho);
    let sxx = -p + eta * 2.0 * grad.dux_dx;
    let syy = -p + eta * 2.0 * grad.duy_dy;
    let sxy = eta * (grad.dux_dy + grad.duy_dx);
    Matrix2::new(sxx, sxy, sxy, syy)
}

/// Stress tensor at a grid cell, with dynamic viscosity `eta = nu * rho`.
pub fn stress_at_cell(field: &PopulationField, ix: usize, iy: usize, nu: f64, dt: f64) -> Matrix2<f64> {
    let rho = field.rho(ix, iy, Buffer::Current);
    let grad = velocity_gradient(field, ix, iy, dt);
    newtonian_stress(rho, nu * rho, &grad)
}
