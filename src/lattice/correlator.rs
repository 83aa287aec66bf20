// SPDX-License-Identifier: AGPL-3.0-only

//! Zero-momentum hadron correlators and effective masses.
//!
//! Three channels are contracted from one point-to-all propagator S(x; 0):
//!
//! - **Pseudoscalar (π-like)**: C(t) = Σ_x Tr[S S†], a sum of squared
//!   magnitudes, so C(t) ≥ 0 identically.
//! - **Vector (ρ-like)**: C(t) = (1/3) Σ_x Σ_{k=1..3}
//!   Re Tr[γ_k S (γ_kγ₅) S† γ₅].
//! - **Baryon (p-like)**: local nucleon interpolator
//!   N = ε^{abc}(uᵃᵀ Cγ₅ dᵇ) uᶜ, positive-parity projected; only the
//!   direct Wick contraction is computed. The exchange term from the two
//!   identical valence quarks is omitted, a deliberate approximation kept
//!   for parity with the established analysis chain.
//!
//! Effective masses come from the median of adjacent log ratios of |C|,
//! which tolerates the sign noise of baryon correlators on coarse
//! ensembles.

use rayon::prelude::*;

use super::complex_f64::Complex64;
use super::constants::N_COLORS;
use super::gamma::GammaSet;
use super::propagator::Propagator;
use super::wilson::Lattice;

/// Nonzero permutations of (0,1,2) with signs, for the ε^{abc} contraction.
const LEVI_CIVITA: [(usize, usize, usize, f64); 6] = [
    (0, 1, 2, 1.0),
    (1, 2, 0, 1.0),
    (2, 0, 1, 1.0),
    (0, 2, 1, -1.0),
    (2, 1, 0, -1.0),
    (1, 0, 2, -1.0),
];

/// Pseudoscalar correlator C(t) = Σ_x Σ indices |S(x)|².
#[must_use]
pub fn pion_correlator(lattice: &Lattice, prop: &Propagator) -> Vec<f64> {
    let nt = lattice.time_extent();
    let sv = lattice.spatial_volume();

    (0..nt)
        .into_par_iter()
        .map(|t| {
            let mut acc = 0.0;
            for site in t * sv..(t + 1) * sv {
                let block = &prop.data[site];
                for s in 0..4 {
                    for s0 in 0..4 {
                        for c in 0..N_COLORS {
                            for c0 in 0..N_COLORS {
                                acc += block[s][s0][c][c0].abs_sq();
                            }
                        }
                    }
                }
            }
            acc
        })
        .collect()
}

/// Vector correlator, averaged over the three spatial gamma insertions.
///
/// C(t) = (1/3) Σ_x Σ_{k=1..3} Re Tr[γ_k S (γ_kγ₅) S† γ₅], using
/// γ₅-hermiticity to express the backward propagator through S†.
#[must_use]
pub fn rho_correlator(lattice: &Lattice, prop: &Propagator, gammas: &GammaSet) -> Vec<f64> {
    let nt = lattice.time_extent();
    let sv = lattice.spatial_volume();
    let g5 = gammas.gamma5;

    (0..nt)
        .into_par_iter()
        .map(|t| {
            let mut acc = Complex64::ZERO;
            for site in t * sv..(t + 1) * sv {
                for k in 1..4 {
                    let gk = gammas.gamma[k];
                    let gk_g5 = gk * g5;
                    for a in 0..N_COLORS {
                        for b in 0..N_COLORS {
                            let s_ab = prop.spin_block(site, a, b);
                            let contracted = gk * s_ab * gk_g5 * s_ab.adjoint() * g5;
                            acc += contracted.trace();
                        }
                    }
                }
            }
            acc.re / 3.0
        })
        .collect()
}

/// Baryon correlator, direct Wick contraction only.
///
/// C(t) = Σ_x Σ_ε ε^{abc} ε^{a'b'c'} Tr[P₊ S_cc'] · Tr[Γ S_bb' Γ̄ S_aa'ᵀ]
/// with Γ = Cγ₅ and Γ̄ = γ₅C. The same-flavor exchange diagram is
/// intentionally not included.
#[must_use]
pub fn proton_correlator_direct(
    lattice: &Lattice,
    prop: &Propagator,
    gammas: &GammaSet,
) -> Vec<f64> {
    let nt = lattice.time_extent();
    let sv = lattice.spatial_volume();
    let gam = gammas.charge_conj * gammas.gamma5;
    let gam_bar = gammas.gamma5 * gammas.charge_conj;
    let parity = gammas.parity_plus;

    (0..nt)
        .into_par_iter()
        .map(|t| {
            let mut acc = Complex64::ZERO;
            for site in t * sv..(t + 1) * sv {
                for &(a, b, c, sign_sink) in &LEVI_CIVITA {
                    for &(ap, bp, cp, sign_src) in &LEVI_CIVITA {
                        let s_a = prop.spin_block(site, a, ap);
                        let s_b = prop.spin_block(site, b, bp);
                        let s_c = prop.spin_block(site, c, cp);

                        let diquark = (gam * s_b * gam_bar * s_a.transpose()).trace();
                        let projected = (parity * s_c).trace() * diquark;
                        acc += projected.scale(sign_sink * sign_src);
                    }
                }
            }
            acc.re
        })
        .collect()
}

/// Effective mass from the median of adjacent log ratios.
///
/// For t in [1, T−3] with |C(t)| and |C(t+1)| both strictly positive,
/// collect ln(|C(t)|/|C(t+1)|); return the median, or NaN when no valid
/// pair exists. The median (rather than a fit) is robust against the
/// sign fluctuations of noisy baryon correlators.
#[must_use]
pub fn effective_mass(correlator: &[f64]) -> f64 {
    let nt = correlator.len();
    let mut ratios = Vec::new();
    for t in 1..nt.saturating_sub(2) {
        let ct = correlator[t].abs();
        let ct1 = correlator[t + 1].abs();
        if ct > 0.0 && ct1 > 0.0 {
            ratios.push((ct / ct1).ln());
        }
    }
    if ratios.is_empty() {
        return f64::NAN;
    }
    ratios.sort_by(f64::total_cmp);
    ratios[ratios.len() / 2]
}
