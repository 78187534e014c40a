use rayon::prelude::*;

use crate::domain::d2q9::Q;
use crate::domain::population::PopulationField;

/// Periodic streaming from the next buffer into the current buffer.
///
/// Written in pull form: each destination `(x, i)` reads `next` at
/// `x - v_i`, which is the same bijection as pushing `(x, i)` to `x + v_i`
/// and lets every cell be filled independently. Every entry of `current`
/// is overwritten.
pub fn stream(field: &mut PopulationField) {
    let grid = *field.grid();
    let (next, current) = field.streaming_buffers();
    current
        .par_chunks_exact_mut(Q)
        .enumerate()
        .for_each(|(cell, f_dst)| {
            let (ix, iy) = grid.coords(cell);
            for (i, fi) in f_dst.iter_mut().enumerate() {
                let (sx, sy) = grid.upstream(ix, iy, i);
                *fi = next[grid.index(sx, sy, i)];
            }
        });
}
