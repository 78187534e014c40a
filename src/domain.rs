pub mod d2q9;
pub mod grid2d;
pub mod population;
