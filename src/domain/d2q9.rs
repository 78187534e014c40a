//! D2Q9 velocity set.
//!
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

/// Number of discrete velocities per cell.
pub const Q: usize = 9;

/// Lattice velocity vectors `[vx, vy]`.
pub const VELOCITIES: [[i32; 2]; Q] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

/// Quadrature weights matching `VELOCITIES`.
pub const WEIGHTS: [f64; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Velocity of direction `i` as floats.
#[inline]
pub fn velocity(i: usize) -> (f64, f64) {
    let [vx, vy] = VELOCITIES[i];
    (vx as f64, vy as f64)
}

/// Second-order Maxwell-Boltzmann expansion:
/// f_eq = rho * w_i * (1 + 3 (v.u) + 4.5 (v.u)^2 - 1.5 |u|^2)
#[inline]
pub fn equilibrium(rho0: f64, ux0: f64, uy0: f64, i: usize) -> f64 {
    let (vx, vy) = velocity(i);
    let u_dot_v = ux0 * vx + uy0 * vy;
    let u2 = ux0 * ux0 + uy0 * uy0;
    rho0 * WEIGHTS[i] * (1.0 + 3.0 * u_dot_v + 4.5 * u_dot_v * u_dot_v - 1.5 * u2)
}
