use rayon::prelude::*;

use crate::domain::d2q9::{self, Q};
use crate::domain::population::{moments, PopulationField};

/// BGK relaxation of the current buffer into the next buffer:
/// `next = (1 - 1/tau) * current + (1/tau) * f_eq(rho, u)`.
pub fn collide(field: &mut PopulationField, tau: f64) {
    let omega = 1.0 / tau;
    let keep = 1.0 - omega;
    let (current, next) = field.collision_buffers();
    next.par_chunks_exact_mut(Q)
        .zip(current.par_chunks_exact(Q))
        .for_each(|(f_next, f_cur)| {
            let (rho0, ux0, uy0) = moments(f_cur);
            for (i, (fi_next, &fi)) in f_next.iter_mut().zip(f_cur).enumerate() {
                *fi_next = keep * fi + omega * d2q9::equilibrium(rho0, ux0, uy0, i);
            }
        });
}
