// SPDX-License-Identifier: AGPL-3.0-only

//! Wilson-Dirac operator on 4-spinor, 3-color fields.
//!
//! With the Wilson parameter r = 1 and the bare mass absorbed into the
//! hopping parameter κ:
//!
//!   (Dψ)(x) = ψ(x) − κ Σ_μ [ (1−γ_μ) `U_μ`(x) ψ(x+μ̂)
//!                          + (1+γ_μ) `U_μ`†(x−μ̂) ψ(x−μ̂) ]
//!
//! The adjoint is never formed explicitly: D† = γ₅Dγ₅ (γ₅-hermiticity),
//! which the normal-equations solver uses directly.
//!
//! # References
//!
//! - Wilson, in "New Phenomena in Subnuclear Physics" (1977)
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 5

use super::complex_f64::Complex64;
use super::constants::{N_COLORS, N_SPIN};
use super::gamma::{GammaSet, SpinMatrix};
use super::su3::Su3Matrix;
use super::wilson::Lattice;

/// One site's worth of fermion data: `[spin][color]`.
pub type Spinor = [[Complex64; N_COLORS]; N_SPIN];

/// A spinor field: one [`Spinor`] per lattice site.
pub struct SpinorField {
    pub data: Vec<Spinor>,
    pub volume: usize,
}

impl SpinorField {
    /// Zero field.
    #[must_use]
    pub fn zeros(volume: usize) -> Self {
        Self {
            data: vec![[[Complex64::ZERO; N_COLORS]; N_SPIN]; volume],
            volume,
        }
    }

    /// Uniform [−0.5, 0.5) random entries, for solver tests.
    #[must_use]
    pub fn random(volume: usize, seed: u64) -> Self {
        use super::constants::lcg_uniform_f64;
        let mut rng = seed;
        let mut field = Self::zeros(volume);
        for site in &mut field.data {
            for spin in site.iter_mut() {
                for c in spin.iter_mut() {
                    let re = lcg_uniform_f64(&mut rng) - 0.5;
                    let im = lcg_uniform_f64(&mut rng) - 0.5;
                    *c = Complex64::new(re, im);
                }
            }
        }
        field
    }

    /// Inner product ⟨self|other⟩ = Σ conj(self)·other.
    pub fn dot(&self, other: &Self) -> Complex64 {
        let mut sum = Complex64::ZERO;
        for (a, b) in self.data.iter().zip(other.data.iter()) {
            for s in 0..N_SPIN {
                for c in 0..N_COLORS {
                    sum += a[s][c].conj() * b[s][c];
                }
            }
        }
        sum
    }

    /// Squared norm ⟨self|self⟩.
    #[must_use]
    pub fn norm_sq(&self) -> f64 {
        self.dot(self).re
    }

    /// self += a·x with a real.
    pub fn axpy(&mut self, a: f64, x: &Self) {
        for (si, xi) in self.data.iter_mut().zip(x.data.iter()) {
            for s in 0..N_SPIN {
                for c in 0..N_COLORS {
                    si[s][c] += xi[s][c].scale(a);
                }
            }
        }
    }

    /// Copy contents from another field of the same volume.
    pub fn copy_from(&mut self, other: &Self) {
        self.data.copy_from_slice(&other.data);
    }
}

/// U acting on the color index of each spin component.
fn color_rotate(u: &Su3Matrix, s: &Spinor) -> Spinor {
    let mut out = [[Complex64::ZERO; N_COLORS]; N_SPIN];
    for spin in 0..N_SPIN {
        for c in 0..N_COLORS {
            let mut acc = Complex64::ZERO;
            for cp in 0..N_COLORS {
                acc += u.m[c][cp] * s[spin][cp];
            }
            out[spin][c] = acc;
        }
    }
    out
}

/// U† acting on the color index of each spin component.
fn color_rotate_dagger(u: &Su3Matrix, s: &Spinor) -> Spinor {
    let mut out = [[Complex64::ZERO; N_COLORS]; N_SPIN];
    for spin in 0..N_SPIN {
        for c in 0..N_COLORS {
            let mut acc = Complex64::ZERO;
            for cp in 0..N_COLORS {
                acc += u.m[cp][c].conj() * s[spin][cp];
            }
            out[spin][c] = acc;
        }
    }
    out
}

/// A spin matrix acting on the spin index of a site spinor.
fn spin_rotate(m: &SpinMatrix, s: &Spinor) -> Spinor {
    let mut out = [[Complex64::ZERO; N_COLORS]; N_SPIN];
    for spin in 0..N_SPIN {
        for sp in 0..N_SPIN {
            let coeff = m.m[spin][sp];
            for c in 0..N_COLORS {
                out[spin][c] += coeff * s[sp][c];
            }
        }
    }
    out
}

/// Apply the Wilson-Dirac operator: out = D ψ.
#[must_use]
pub fn apply_wilson(
    lattice: &Lattice,
    gammas: &GammaSet,
    psi: &SpinorField,
    kappa: f64,
) -> SpinorField {
    let vol = lattice.volume();
    let mut out = SpinorField::zeros(vol);

    // Hopping projectors 1 ∓ γ_μ, fixed for the whole application.
    let mut proj_minus = [SpinMatrix::ZERO; 4];
    let mut proj_plus = [SpinMatrix::ZERO; 4];
    for mu in 0..4 {
        proj_minus[mu] = SpinMatrix::IDENTITY - gammas.gamma[mu];
        proj_plus[mu] = SpinMatrix::IDENTITY + gammas.gamma[mu];
    }

    for idx in 0..vol {
        let x = lattice.site_coords(idx);
        let mut acc = psi.data[idx];

        for mu in 0..4 {
            let x_fwd = lattice.neighbor(x, mu, true);
            let u_fwd = lattice.link(x, mu);
            let hop_fwd = spin_rotate(
                &proj_minus[mu],
                &color_rotate(&u_fwd, &psi.data[lattice.site_index(x_fwd)]),
            );

            let x_bwd = lattice.neighbor(x, mu, false);
            let u_bwd = lattice.link(x_bwd, mu);
            let hop_bwd = spin_rotate(
                &proj_plus[mu],
                &color_rotate_dagger(&u_bwd, &psi.data[lattice.site_index(x_bwd)]),
            );

            for s in 0..N_SPIN {
                for c in 0..N_COLORS {
                    acc[s][c] -= (hop_fwd[s][c] + hop_bwd[s][c]).scale(kappa);
                }
            }
        }

        out.data[idx] = acc;
    }

    out
}

/// Apply γ₅ sitewise.
#[must_use]
pub fn apply_gamma5(gammas: &GammaSet, psi: &SpinorField) -> SpinorField {
    let mut out = SpinorField::zeros(psi.volume);
    for (o, s) in out.data.iter_mut().zip(psi.data.iter()) {
        *o = spin_rotate(&gammas.gamma5, s);
    }
    out
}

/// Apply D† = γ₅Dγ₅ without forming the adjoint operator.
#[must_use]
pub fn apply_wilson_dagger(
    lattice: &Lattice,
    gammas: &GammaSet,
    psi: &SpinorField,
    kappa: f64,
) -> SpinorField {
    let g5_psi = apply_gamma5(gammas, psi);
    let d_g5_psi = apply_wilson(lattice, gammas, &g5_psi, kappa);
    apply_gamma5(gammas, &d_g5_psi)
}

/// Apply the normal operator D†D (Hermitian positive semi-definite).
#[must_use]
pub fn apply_normal(
    lattice: &Lattice,
    gammas: &GammaSet,
    psi: &SpinorField,
    kappa: f64,
) -> SpinorField {
    let d_psi = apply_wilson(lattice, gammas, psi, kappa);
    apply_wilson_dagger(lattice, gammas, &d_psi, kappa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::su3::Su3Matrix;

    fn perturbed_lattice(seed: u64) -> Lattice {
        let mut lat = Lattice::cold_start(2, 4, 5.7);
        let mut s = seed;
        for link in &mut lat.links {
            *link = (*link * Su3Matrix::random_near_identity(&mut s, 0.3)).reunitarize();
        }
        lat
    }

    #[test]
    fn dirac_on_zero_field_is_zero() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        let gammas = GammaSet::euclidean();
        let psi = SpinorField::zeros(lat.volume());
        let out = apply_wilson(&lat, &gammas, &psi, 0.12);
        assert!(out.norm_sq() < 1e-20, "D × 0 should be 0");
    }

    #[test]
    fn uniform_mode_on_cold_lattice() {
        // On identity links, a constant spinor is an eigenvector:
        // Dψ = (1 − 8κ)ψ since the ±γ_μ pieces cancel pairwise.
        let lat = Lattice::cold_start(2, 4, 5.7);
        let gammas = GammaSet::euclidean();
        let kappa = 0.12;

        let mut psi = SpinorField::zeros(lat.volume());
        for site in &mut psi.data {
            site[1][2] = Complex64::new(1.0, -0.5);
        }

        let out = apply_wilson(&lat, &gammas, &psi, kappa);
        let factor = 1.0 - 8.0 * kappa;
        for (o, p) in out.data.iter().zip(psi.data.iter()) {
            for s in 0..N_SPIN {
                for c in 0..N_COLORS {
                    let expected = p[s][c].scale(factor);
                    assert!(
                        (o[s][c] - expected).abs() < 1e-12,
                        "uniform mode should scale by 1-8κ"
                    );
                }
            }
        }
    }

    #[test]
    fn gamma5_hermiticity_defines_the_adjoint() {
        // ⟨φ|Dψ⟩ = ⟨D†φ|ψ⟩ with D† = γ₅Dγ₅, on a disordered field.
        let lat = perturbed_lattice(42);
        let gammas = GammaSet::euclidean();
        let kappa = 0.12;
        let vol = lat.volume();

        let phi = SpinorField::random(vol, 1);
        let psi = SpinorField::random(vol, 2);

        let lhs = phi.dot(&apply_wilson(&lat, &gammas, &psi, kappa));
        let rhs = apply_wilson_dagger(&lat, &gammas, &phi, kappa).dot(&psi);

        assert!(
            (lhs.re - rhs.re).abs() < 1e-10 && (lhs.im - rhs.im).abs() < 1e-10,
            "⟨φ|Dψ⟩ = {lhs:?} but ⟨D†φ|ψ⟩ = {rhs:?}"
        );
    }

    #[test]
    fn normal_operator_is_positive() {
        let lat = perturbed_lattice(9);
        let gammas = GammaSet::euclidean();
        let psi = SpinorField::random(lat.volume(), 3);
        let ndd = apply_normal(&lat, &gammas, &psi, 0.12);
        let quad = psi.dot(&ndd).re;
        assert!(quad > 0.0, "⟨ψ|D†D|ψ⟩ should be positive: {quad}");
    }

    #[test]
    fn dot_product_conjugate_symmetry() {
        let a = SpinorField::random(16, 5);
        let b = SpinorField::random(16, 6);
        let ab = a.dot(&b);
        let ba = b.dot(&a);
        assert!((ab.re - ba.re).abs() < 1e-12);
        assert!((ab.im + ba.im).abs() < 1e-12);
    }
}
