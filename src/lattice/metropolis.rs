// SPDX-License-Identifier: AGPL-3.0-only

//! Single-link Metropolis updates under the Wilson plaquette action.
//!
//! One sweep visits every (site, direction) pair exactly once, in ascending
//! site-index order with μ innermost. Each visit proposes a projected random
//! perturbation of the current link and accepts it with probability
//! min(1, exp(−ΔS)) where
//!
//!   ΔS = −(β/3)·(Re Tr[`U_new`·S] − Re Tr[`U_old`·S])
//!
//! and S is the staple sum. Updates within a sweep see already-updated
//! neighbors; the scan order is part of the algorithm's definition and must
//! not be reordered or parallelized.
//!
//! No convergence is checked here; the ensemble driver supplies a fixed
//! thermalization sweep count.
//!
//! # References
//!
//! - Metropolis et al., JCP 21, 1087 (1953)
//! - Creutz, "Quarks, Gluons and Lattices" (1983), Ch. 12

use super::complex_f64::Complex64;
use super::constants::{lcg_gaussian, lcg_uniform_f64};
use super::su3::Su3Matrix;
use super::wilson::Lattice;

/// Metropolis sweep parameters.
#[derive(Clone, Copy, Debug)]
pub struct SweepConfig {
    /// Proposal spread: `R = I + step·(G + iG')` with unit Gaussian entries.
    pub step: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { step: 0.24 }
    }
}

/// Acceptance accounting for one or more sweeps.
#[derive(Clone, Copy, Debug, Default)]
pub struct SweepStats {
    /// Link updates proposed.
    pub proposed: usize,
    /// Link updates accepted.
    pub accepted: usize,
}

impl SweepStats {
    /// Fraction of proposals accepted.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }

    /// Merge counts from another batch of sweeps.
    pub fn merge(&mut self, other: SweepStats) {
        self.proposed += other.proposed;
        self.accepted += other.accepted;
    }
}

/// One full Metropolis sweep over every link of the lattice.
///
/// `seed` is the shared random stream; proposals draw 18 Gaussians (real
/// entries first, then imaginary) and the accept step draws one uniform
/// only when ΔS ≥ 0.
pub fn metropolis_sweep(lattice: &mut Lattice, config: &SweepConfig, seed: &mut u64) -> SweepStats {
    let vol = lattice.volume();
    let mut stats = SweepStats::default();

    for idx in 0..vol {
        let x = lattice.site_coords(idx);
        for mu in 0..4 {
            let staple = lattice.staple(x, mu);
            let u_old = lattice.link(x, mu);
            let u_new = (propose_perturbation(config.step, seed) * u_old).reunitarize();

            let delta_s = -lattice.beta / 3.0
                * ((u_new * staple).re_trace() - (u_old * staple).re_trace());

            stats.proposed += 1;
            let accept = delta_s < 0.0 || lcg_uniform_f64(seed) < (-delta_s).exp();
            if accept {
                lattice.set_link(x, mu, u_new);
                stats.accepted += 1;
            }
        }
    }

    stats
}

/// Run `n` sweeps and merge acceptance statistics.
pub fn run_sweeps(
    lattice: &mut Lattice,
    n: usize,
    config: &SweepConfig,
    seed: &mut u64,
) -> SweepStats {
    let mut stats = SweepStats::default();
    for _ in 0..n {
        stats.merge(metropolis_sweep(lattice, config, seed));
    }
    stats
}

/// Proposal factor R = I + step·(G + iG'), G entries ~ N(0,1).
fn propose_perturbation(step: f64, seed: &mut u64) -> Su3Matrix {
    let mut r = Su3Matrix::IDENTITY;
    for row in &mut r.m {
        for cell in row.iter_mut() {
            *cell += Complex64::new(step * lcg_gaussian(seed), 0.0);
        }
    }
    for row in &mut r.m {
        for cell in row.iter_mut() {
            *cell += Complex64::new(0.0, step * lcg_gaussian(seed));
        }
    }
    r
}
