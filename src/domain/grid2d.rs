use crate::domain::d2q9::{Q, VELOCITIES};
use crate::error::GridError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions2D(pub usize, pub usize); // lx, ly

/// Periodic lattice of `lx * ly` cells.
///
/// Populations are laid out cell-major, column by column:
///
/// ```text
///  index = (ix * ly + iy) * Q + i
///
///  iy ↑
///     | (0,2) (1,2) (2,2)
///     | (0,1) (1,1) (2,1)
///     | (0,0) (1,0) (2,0)
///     +-------------------→ ix
/// ```
///
/// Every coordinate that may leave `[0, lx) x [0, ly)` goes through
/// [`Grid2D::wrap`], which is the only place the torus is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid2D {
    pub dimensions: GridDimensions2D,
}

impl Grid2D {
    pub fn new(dimensions: GridDimensions2D) -> Result<Self, GridError> {
        let GridDimensions2D(lx, ly) = dimensions;
        if lx < 1 || ly < 1 {
            return Err(GridError::InvalidGridSize(
                "Grid dimensions (lx, ly) must be at least 1x1.".to_string(),
            ));
        }
        if lx > i32::MAX as usize || ly > i32::MAX as usize {
            return Err(GridError::InvalidGridSize(format!(
                "Grid dimensions ({}, {}) exceed the addressable range.",
                lx, ly
            )));
        }
        Ok(Self { dimensions })
    }

    #[inline]
    pub fn lx(&self) -> usize {
        self.dimensions.0
    }

    #[inline]
    pub fn ly(&self) -> usize {
        self.dimensions.1
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.lx() * self.ly()
    }

    /// Length of a full population buffer.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.num_cells() * Q
    }

    /// Linear cell index of `(ix, iy)`.
    #[inline]
    pub fn cell(&self, ix: usize, iy: usize) -> usize {
        ix * self.ly() + iy
    }

    /// Inverse of [`Grid2D::cell`].
    #[inline]
    pub fn coords(&self, cell: usize) -> (usize, usize) {
        (cell / self.ly(), cell % self.ly())
    }

    /// Linear population index of direction `i` at `(ix, iy)`.
    #[inline]
    pub fn index(&self, ix: usize, iy: usize, i: usize) -> usize {
        self.cell(ix, iy) * Q + i
    }

    /// Maps any integer coordinate onto the torus.
    #[inline]
    pub fn wrap(&self, ix: i64, iy: i64) -> (usize, usize) {
        (
            ix.rem_euclid(self.lx() as i64) as usize,
            iy.rem_euclid(self.ly() as i64) as usize,
        )
    }

    /// Cell reached from `(ix, iy)` by one step along direction `i`.
    #[inline]
    pub fn neighbor(&self, ix: usize, iy: usize, i: usize) -> (usize, usize) {
        let [vx, vy] = VELOCITIES[i];
        self.wrap(ix as i64 + vx as i64, iy as i64 + vy as i64)
    }

    /// Cell whose direction-`i` population streams into `(ix, iy)`.
    #[inline]
    pub fn upstream(&self, ix: usize, iy: usize, i: usize) -> (usize, usize) {
        let [vx, vy] = VELOCITIES[i];
        self.wrap(ix as i64 - vx as i64, iy as i64 - vy as i64)
    }
}
