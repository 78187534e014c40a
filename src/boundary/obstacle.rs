use serde::{Deserialize, Serialize};

use crate::domain::grid2d::Grid2D;
use crate::error::SolverError;

/// One side of the rectangular obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Bottom,
    Top,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Top, Edge::Left, Edge::Right];
}

/// Axis-aligned rectangle in continuum lattice coordinates.
///
/// ```text
///   (d-a, e+b) +---------+ (d, e+b)
///              |         |
///   (d-a, e)   +---------+ (d, e)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectObstacle {
    /// `a`
    pub width: f64,
    /// `b`
    pub height: f64,
    /// `d`
    pub right_edge: f64,
    /// `e`
    pub bottom_edge: f64,
}

impl RectObstacle {
    pub fn new(width: f64, height: f64, right_edge: f64, bottom_edge: f64) -> Self {
        Self {
            width,
            height,
            right_edge,
            bottom_edge,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.right_edge - self.width
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.right_edge
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bottom_edge
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.bottom_edge + self.height
    }

    pub fn edge_length(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Bottom | Edge::Top => self.width,
            Edge::Left | Edge::Right => self.height,
        }
    }

    /// Strict interior test used for no-slip forcing.
    #[inline]
    pub fn contains_strictly(&self, x: f64, y: f64) -> bool {
        y < self.top() && y > self.bottom() && x > self.left() && x < self.right()
    }

    /// Checks the rectangle against the grid it is immersed in.
    ///
    /// A zero-sized rectangle is accepted: it yields no forced cells and a
    /// zero force.
    pub fn validate(&self, grid: &Grid2D) -> Result<(), SolverError> {
        let values = [self.width, self.height, self.right_edge, self.bottom_edge];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidGeometry(format!(
                "obstacle parameters must be finite: {:?}",
                self
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(SolverError::InvalidGeometry(format!(
                "obstacle width and height must be non-negative, got a={} b={}",
                self.width, self.height
            )));
        }
        let max_x = (grid.lx() - 1) as f64;
        let max_y = (grid.ly() - 1) as f64;
        if self.left() < 0.0 || self.right() > max_x {
            return Err(SolverError::InvalidGeometry(format!(
                "obstacle x-extent [{}, {}] outside grid [0, {}]",
                self.left(),
                self.right(),
                max_x
            )));
        }
        if self.bottom() < 0.0 || self.top() > max_y {
            return Err(SolverError::InvalidGeometry(format!(
                "obstacle y-extent [{}, {}] outside grid [0, {}]",
                self.bottom(),
                self.top(),
                max_y
            )));
        }
        Ok(())
    }
}
