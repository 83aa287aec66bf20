// SPDX-License-Identifier: AGPL-3.0-only

//! Euclidean gamma matrices and 4×4 spin algebra.
//!
//! The set satisfies {γ_μ, γ_ν} = 2δ_μν·I with γ_μ² = I, built from the
//! Minkowski Dirac basis by Wick-rotating the spatial matrices,
//! γ_k → i·γ_k. With true projectors (1 ± γ_μ)/2 the Wilson hopping term
//! is well defined.
//!
//! γ₅ = γ₀γ₁γ₂γ₃ squares to I and anticommutes with every γ_μ; it supplies
//! the hermiticity relation D† = γ₅Dγ₅ used by the solver. The charge
//! conjugation matrix C = γ₂γ₀ and the positive-parity projector
//! P₊ = (I + γ₀)/2 enter the baryon contraction.
//!
//! # References
//!
//! - Gattringer & Lang, "QCD on the Lattice" (2010), App. A
//! - Montvay & Münster, "Quantum Fields on a Lattice" (1994), Ch. 4

use std::ops::{Add, Mul, Sub};

use super::complex_f64::Complex64;

/// 4×4 complex matrix acting on spin indices.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct SpinMatrix {
    /// Matrix elements m[row][col].
    pub m: [[Complex64; 4]; 4],
}

impl Mul for SpinMatrix {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                let mut s = Complex64::ZERO;
                for k in 0..4 {
                    s += self.m[i][k] * rhs.m[k][j];
                }
                r.m[i][j] = s;
            }
        }
        r
    }
}

impl Add for SpinMatrix {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][j] + rhs.m[i][j];
            }
        }
        r
    }
}

impl Sub for SpinMatrix {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][j] - rhs.m[i][j];
            }
        }
        r
    }
}

impl SpinMatrix {
    /// 4×4 identity.
    pub const IDENTITY: Self = {
        let mut m = [[Complex64::ZERO; 4]; 4];
        m[0][0] = Complex64::ONE;
        m[1][1] = Complex64::ONE;
        m[2][2] = Complex64::ONE;
        m[3][3] = Complex64::ONE;
        Self { m }
    };

    /// Zero matrix.
    pub const ZERO: Self = Self {
        m: [[Complex64::ZERO; 4]; 4],
    };

    /// Scale every element by a real factor.
    pub fn scale(self, s: f64) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][j].scale(s);
            }
        }
        r
    }

    /// Scale every element by a complex factor.
    pub fn scale_complex(self, s: Complex64) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][j] * s;
            }
        }
        r
    }

    /// Trace.
    pub fn trace(self) -> Complex64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2] + self.m[3][3]
    }

    /// Plain transpose (no conjugation).
    pub fn transpose(self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[j][i];
            }
        }
        r
    }

    /// Conjugate transpose.
    pub fn adjoint(self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[j][i].conj();
            }
        }
        r
    }

    /// Largest |element| of the difference to another matrix.
    #[must_use]
    pub fn max_abs_diff(self, other: Self) -> f64 {
        let mut worst = 0.0_f64;
        for i in 0..4 {
            for j in 0..4 {
                worst = worst.max((self.m[i][j] - other.m[i][j]).abs());
            }
        }
        worst
    }
}

/// The Euclidean gamma set and its derived matrices.
#[derive(Clone, Copy, Debug)]
pub struct GammaSet {
    /// γ₀..γ₃ with {γ_μ, γ_ν} = 2δ_μν.
    pub gamma: [SpinMatrix; 4],
    /// γ₅ = γ₀γ₁γ₂γ₃.
    pub gamma5: SpinMatrix,
    /// Positive-parity projector (I + γ₀)/2.
    pub parity_plus: SpinMatrix,
    /// Charge conjugation C = γ₂γ₀.
    pub charge_conj: SpinMatrix,
}

impl GammaSet {
    /// Build the Euclidean set from the Minkowski Dirac basis.
    #[must_use]
    pub fn euclidean() -> Self {
        let zero2 = [[Complex64::ZERO; 2]; 2];
        let ident2 = [
            [Complex64::ONE, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ONE],
        ];
        let sigma1 = [
            [Complex64::ZERO, Complex64::ONE],
            [Complex64::ONE, Complex64::ZERO],
        ];
        let sigma2 = [
            [Complex64::ZERO, Complex64::new(0.0, -1.0)],
            [Complex64::I, Complex64::ZERO],
        ];
        let sigma3 = [
            [Complex64::ONE, Complex64::ZERO],
            [Complex64::ZERO, Complex64::new(-1.0, 0.0)],
        ];

        let gamma0 = from_blocks(ident2, zero2, zero2, neg2(ident2));
        // Spatial Wick rotation: γ_k = i·[[0, σ_k], [−σ_k, 0]].
        let gamma1 = from_blocks(zero2, sigma1, neg2(sigma1), zero2).scale_complex(Complex64::I);
        let gamma2 = from_blocks(zero2, sigma2, neg2(sigma2), zero2).scale_complex(Complex64::I);
        let gamma3 = from_blocks(zero2, sigma3, neg2(sigma3), zero2).scale_complex(Complex64::I);

        let gamma5 = gamma0 * gamma1 * gamma2 * gamma3;
        let parity_plus = (SpinMatrix::IDENTITY + gamma0).scale(0.5);
        let charge_conj = gamma2 * gamma0;

        Self {
            gamma: [gamma0, gamma1, gamma2, gamma3],
            gamma5,
            parity_plus,
            charge_conj,
        }
    }
}

/// Assemble a 4×4 from 2×2 blocks [[a, b], [c, d]].
fn from_blocks(
    a: [[Complex64; 2]; 2],
    b: [[Complex64; 2]; 2],
    c: [[Complex64; 2]; 2],
    d: [[Complex64; 2]; 2],
) -> SpinMatrix {
    let mut r = SpinMatrix::ZERO;
    for i in 0..2 {
        for j in 0..2 {
            r.m[i][j] = a[i][j];
            r.m[i][j + 2] = b[i][j];
            r.m[i + 2][j] = c[i][j];
            r.m[i + 2][j + 2] = d[i][j];
        }
    }
    r
}

fn neg2(a: [[Complex64; 2]; 2]) -> [[Complex64; 2]; 2] {
    [[-a[0][0], -a[0][1]], [-a[1][0], -a[1][1]]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::GAMMA_ALGEBRA_ABS;

    #[test]
    fn clifford_algebra() {
        let set = GammaSet::euclidean();
        for mu in 0..4 {
            for nu in 0..4 {
                let anti = set.gamma[mu] * set.gamma[nu] + set.gamma[nu] * set.gamma[mu];
                let expected = if mu == nu {
                    SpinMatrix::IDENTITY.scale(2.0)
                } else {
                    SpinMatrix::ZERO
                };
                assert!(
                    anti.max_abs_diff(expected) < GAMMA_ALGEBRA_ABS,
                    "{{γ_{mu}, γ_{nu}}} violates the algebra by {:.3e}",
                    anti.max_abs_diff(expected)
                );
            }
        }
    }

    #[test]
    fn gamma5_squares_to_identity() {
        let set = GammaSet::euclidean();
        let sq = set.gamma5 * set.gamma5;
        assert!(sq.max_abs_diff(SpinMatrix::IDENTITY) < GAMMA_ALGEBRA_ABS);
    }

    #[test]
    fn gamma5_anticommutes_with_all() {
        let set = GammaSet::euclidean();
        for mu in 0..4 {
            let anti = set.gamma5 * set.gamma[mu] + set.gamma[mu] * set.gamma5;
            assert!(
                anti.max_abs_diff(SpinMatrix::ZERO) < GAMMA_ALGEBRA_ABS,
                "γ₅ must anticommute with γ_{mu}"
            );
        }
    }

    #[test]
    fn gammas_are_hermitian() {
        // Euclidean gammas are Hermitian, so (1 ± γ_μ)/2 are projectors.
        let set = GammaSet::euclidean();
        for mu in 0..4 {
            assert!(
                set.gamma[mu].max_abs_diff(set.gamma[mu].adjoint()) < GAMMA_ALGEBRA_ABS,
                "γ_{mu} should be Hermitian"
            );
        }
    }

    #[test]
    fn parity_projector_is_idempotent() {
        let set = GammaSet::euclidean();
        let p2 = set.parity_plus * set.parity_plus;
        assert!(p2.max_abs_diff(set.parity_plus) < GAMMA_ALGEBRA_ABS);
        let tr = set.parity_plus.trace();
        assert!((tr.re - 2.0).abs() < GAMMA_ALGEBRA_ABS, "rank-2 projector");
    }

    #[test]
    fn spin_matrix_transpose_vs_adjoint() {
        let set = GammaSet::euclidean();
        let g2 = set.gamma[2];
        let diff = g2.transpose().max_abs_diff(g2.adjoint());
        // γ₂ has imaginary entries, so transpose ≠ adjoint.
        assert!(diff > 0.1);
    }
}
