// SPDX-License-Identifier: AGPL-3.0-only

//! Conjugate gradient on the Wilson normal equations.
//!
//! Solves (D†D) x = D†b, with D† supplied through γ₅-hermiticity. The
//! stopping rule is absolute: iterate until ‖r‖² < tol². Exhausting the
//! iteration cap is not an error; the best available iterate is returned
//! and the achieved residual is reported in [`CgStats`] so callers can
//! inspect near-convergence without treating it as failure.
//!
//! # References
//!
//! - Hestenes & Stiefel, J. Res. NBS 49, 409 (1952)
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 8.4

use super::dirac::{apply_normal, apply_wilson_dagger, SpinorField};
use super::gamma::GammaSet;
use super::wilson::Lattice;

/// Solver diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct CgStats {
    /// Whether ‖r‖² dropped below tol² before the cap.
    pub converged: bool,
    /// Iterations performed.
    pub iterations: usize,
    /// Final squared residual ‖r‖².
    pub residual_sq: f64,
}

/// Solve (D†D) x = D†·source by conjugate gradient.
///
/// Returns the solution (best-effort at the cap) and diagnostics.
pub fn solve_normal(
    lattice: &Lattice,
    gammas: &GammaSet,
    kappa: f64,
    source: &SpinorField,
    tol: f64,
    max_iter: usize,
) -> (SpinorField, CgStats) {
    let vol = lattice.volume();
    let tol_sq = tol * tol;

    // Right-hand side of the normal equations.
    let b = apply_wilson_dagger(lattice, gammas, source, kappa);

    let mut x = SpinorField::zeros(vol);
    let mut r = SpinorField::zeros(vol);
    r.copy_from(&b);

    let mut rs = r.norm_sq();
    if rs == 0.0 {
        return (
            x,
            CgStats {
                converged: true,
                iterations: 0,
                residual_sq: 0.0,
            },
        );
    }

    let mut p = SpinorField::zeros(vol);
    p.copy_from(&r);

    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        let ap = apply_normal(lattice, gammas, &p, kappa);
        let p_ap = p.dot(&ap).re;
        if p_ap <= 0.0 {
            // Semi-definite breakdown guard; keep the current iterate.
            break;
        }

        let alpha = rs / p_ap;
        x.axpy(alpha, &p);
        r.axpy(-alpha, &ap);

        let rs_new = r.norm_sq();
        if rs_new < tol_sq {
            rs = rs_new;
            break;
        }

        let beta = rs_new / rs;
        for (pi, ri) in p.data.iter_mut().zip(r.data.iter()) {
            for s in 0..4 {
                for c in 0..3 {
                    pi[s][c] = ri[s][c] + pi[s][c].scale(beta);
                }
            }
        }
        rs = rs_new;
    }

    let stats = CgStats {
        converged: rs < tol_sq,
        iterations,
        residual_sq: rs,
    };
    (x, stats)
}
