use nalgebra::{Point2, Vector2};
use rayon::prelude::*;

use crate::boundary::obstacle::{Edge, RectObstacle};
use crate::domain::population::PopulationField;
use crate::numerical::interpolate::interpolate_stress;

/// Centre of segment `m` (0-based) when `edge` is cut into `n` equal pieces.
pub fn segment_midpoint(obstacle: &RectObstacle, edge: Edge, m: usize, n: usize) -> Point2<f64> {
    let t = (m as f64 + 0.5) / n as f64;
    match edge {
        Edge::Bottom => Point2::new(obstacle.left() + t * obstacle.width, obstacle.bottom()),
        Edge::Top => Point2::new(obstacle.left() + t * obstacle.width, obstacle.top()),
        Edge::Left => Point2::new(obstacle.left(), obstacle.bottom() + t * obstacle.height),
        Edge::Right => Point2::new(obstacle.right(), obstacle.bottom() + t * obstacle.height),
    }
}

/// Outward area element of one segment of `edge`; its length is
/// `edge_length / n`.
pub fn area_element(obstacle: &RectObstacle, edge: Edge, n: usize) -> Vector2<f64> {
    let ds = obstacle.edge_length(edge) / n as f64;
    match edge {
        Edge::Bottom => Vector2::new(0.0, -ds),
        Edge::Top => Vector2::new(0.0, ds),
        Edge::Left => Vector2::new(-ds, 0.0),
        Edge::Right => Vector2::new(ds, 0.0),
    }
}

/// Traction through the area element `da` at `point`: `dF = sigma . dA`.
pub fn differential_force(
    field: &PopulationField,
    point: &Point2<f64>,
    da: &Vector2<f64>,
    nu: f64,
    dt: f64,
) -> Vector2<f64> {
    interpolate_stress(field, point.x, point.y, nu, dt) * *da
}

/// Net force of the fluid on `obstacle`: the sum of `dF` over `n` segments
/// per edge, `4n` in total. Recomputed from scratch on every call.
pub fn force_on_obstacle(
    field: &PopulationField,
    obstacle: &RectObstacle,
    n: usize,
    nu: f64,
    dt: f64,
) -> Vector2<f64> {
    if n == 0 {
        return Vector2::zeros();
    }
    Edge::ALL
        .par_iter()
        .flat_map(|&edge| (0..n).into_par_iter().map(move |m| (edge, m)))
        .map(|(edge, m)| {
            let point = segment_midpoint(obstacle, edge, m, n);
            let da = area_element(obstacle, edge, n);
            differential_force(field, &point, &da, nu, dt)
        })
        .reduce(Vector2::zeros, |a, b| a + b)
}
