use nalgebra::Matrix2;

use crate::domain::population::PopulationField;
use crate::numerical::derive::stress_at_cell;

/// Bilinear weights for the corners `(0,0)`, `(1,0)`, `(0,1)`, `(1,1)` of a
/// unit cell, given fractional offsets `u`, `v`.
#[inline]
pub fn bilinear_weights(u: f64, v: f64) -> [f64; 4] {
    [(1.0 - u) * (1.0 - v), u * (1.0 - v), (1.0 - u) * v, u * v]
}

/// Stress tensor at an arbitrary point `(x, y)`, blended from the four
/// surrounding grid nodes.
///
/// Corners outside the grid wrap periodically, the same way the gradient
/// stencil does. There is no extrapolation guard.
///
/// # Example
/// ```ignore
/// // On a node the interpolant reproduces the node value:
/// let at_node = interpolate_stress(&field, 3.0, 4.0, nu, dt);
/// assert_eq!(at_node, stress_at_cell(&field, 3, 4, nu, dt));
/// ```
pub fn interpolate_stress(field: &PopulationField, x: f64, y: f64, nu: f64, dt: f64) -> Matrix2<f64> {
    let grid = field.grid();
    let fx = x.floor();
    let fy = y.floor();
    let (ix, iy) = (fx as i64, fy as i64);
    let weights = bilinear_weights(x - fx, y - fy);
    let corners = [(0, 0), (1, 0), (0, 1), (1, 1)];

    corners
        .iter()
        .zip(weights.iter())
        .fold(Matrix2::zeros(), |acc, (&(dx, dy), &w)| {
            let (cx, cy) = grid.wrap(ix + dx, iy + dy);
            acc + stress_at_cell(field, cx, cy, nu, dt) * w
        })
}
