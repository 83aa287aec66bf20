// SPDX-License-Identifier: AGPL-3.0-only

//! Point-to-all Wilson propagators.
//!
//! A full point-source propagator S(x; x₀) needs one linear solve per
//! source spin-color pair: 12 independent solves against unit sources.
//! The solves read the same immutable gauge field, so they fan out across
//! threads; assembly order is fixed, keeping results bit-reproducible.

use rayon::prelude::*;

use super::cg::solve_normal;
use super::complex_f64::Complex64;
use super::constants::{N_COLORS, N_SPIN};
use super::dirac::SpinorField;
use super::gamma::GammaSet;
use super::wilson::Lattice;

/// Per-site propagator block indexed `[spin_sink][spin_src][color_sink][color_src]`.
pub type SpinColorBlock = [[[[Complex64; N_COLORS]; N_COLORS]; N_SPIN]; N_SPIN];

/// Point-to-all propagator for a fixed source site.
pub struct Propagator {
    /// One block per sink site.
    pub data: Vec<SpinColorBlock>,
    /// Lattice volume.
    pub volume: usize,
}

/// Aggregated diagnostics over the 12 solves.
///
/// Cap exhaustion stays non-fatal; these numbers exist so a caller can
/// assert near-convergence without changing the outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropagatorStats {
    /// Largest iteration count over the solves.
    pub max_iterations: usize,
    /// Largest final squared residual over the solves.
    pub worst_residual_sq: f64,
    /// Whether every solve met its tolerance.
    pub all_converged: bool,
}

/// Build the point-to-all propagator from `source_site`.
///
/// Each of the 12 spin-color unit sources is solved independently through
/// the normal equations.
#[must_use]
pub fn point_propagator(
    lattice: &Lattice,
    gammas: &GammaSet,
    kappa: f64,
    source_site: [usize; 4],
    tol: f64,
    max_iter: usize,
) -> (Propagator, PropagatorStats) {
    let vol = lattice.volume();
    let src_idx = lattice.site_index(source_site);

    let solves: Vec<_> = (0..N_SPIN * N_COLORS)
        .into_par_iter()
        .map(|sc| {
            let s0 = sc / N_COLORS;
            let c0 = sc % N_COLORS;
            let mut source = SpinorField::zeros(vol);
            source.data[src_idx][s0][c0] = Complex64::ONE;
            solve_normal(lattice, gammas, kappa, &source, tol, max_iter)
        })
        .collect();

    let mut prop = Propagator {
        data: vec![[[[[Complex64::ZERO; N_COLORS]; N_COLORS]; N_SPIN]; N_SPIN]; vol],
        volume: vol,
    };
    let mut stats = PropagatorStats {
        all_converged: true,
        ..Default::default()
    };

    for (sc, (psi, cg)) in solves.iter().enumerate() {
        let s0 = sc / N_COLORS;
        let c0 = sc % N_COLORS;
        for (site, block) in prop.data.iter_mut().enumerate() {
            for s in 0..N_SPIN {
                for c in 0..N_COLORS {
                    block[s][s0][c][c0] = psi.data[site][s][c];
                }
            }
        }
        stats.max_iterations = stats.max_iterations.max(cg.iterations);
        stats.worst_residual_sq = stats.worst_residual_sq.max(cg.residual_sq);
        stats.all_converged &= cg.converged;
    }

    (prop, stats)
}

impl Propagator {
    /// The 4×4 spin block at `site` for fixed sink/source colors.
    #[must_use]
    pub fn spin_block(&self, site: usize, c_sink: usize, c_src: usize) -> super::gamma::SpinMatrix {
        let mut m = super::gamma::SpinMatrix::ZERO;
        for s in 0..N_SPIN {
            for s0 in 0..N_SPIN {
                m.m[s][s0] = self.data[site][s][s0][c_sink][c_src];
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{CG_MAX_ITER, CG_TOLERANCE};

    #[test]
    fn propagator_peaks_at_source() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        let gammas = GammaSet::euclidean();
        let (prop, stats) = point_propagator(
            &lat,
            &gammas,
            0.12,
            [0, 0, 0, 0],
            CG_TOLERANCE,
            CG_MAX_ITER,
        );
        assert!(stats.all_converged, "cold-lattice solves should converge");

        // The source-site diagonal dominates any off-site entry.
        let src_block = prop.spin_block(0, 0, 0);
        let far_site = lat.site_index([2, 1, 1, 1]);
        let far_block = prop.spin_block(far_site, 0, 0);
        assert!(
            src_block.m[0][0].abs() > far_block.m[0][0].abs(),
            "propagator should decay away from the source"
        );
    }

    #[test]
    fn source_spin_color_columns_are_independent() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        let gammas = GammaSet::euclidean();
        let (prop, _) = point_propagator(
            &lat,
            &gammas,
            0.12,
            [0, 0, 0, 0],
            CG_TOLERANCE,
            CG_MAX_ITER,
        );

        // On identity links the operator is color-diagonal, so mixed color
        // entries vanish while diagonal ones do not.
        let block_diag = prop.spin_block(0, 1, 1);
        let block_mixed = prop.spin_block(0, 1, 0);
        assert!(block_diag.m[0][0].abs() > 1e-6);
        assert!(block_mixed.m[0][0].abs() < 1e-8);
    }

    #[test]
    fn stats_aggregate_worst_case() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        let gammas = GammaSet::euclidean();
        let (_, stats) = point_propagator(&lat, &gammas, 0.12, [0, 0, 0, 0], 1e-30, 2);
        assert!(!stats.all_converged);
        assert_eq!(stats.max_iterations, 2);
        assert!(stats.worst_residual_sq > 0.0);
    }
}
