// SPDX-License-Identifier: AGPL-3.0-only

//! SU(3) matrix operations for lattice gauge theory.
//!
//! An SU(3) matrix is a 3×3 unitary matrix with determinant 1. Each link
//! variable `U_μ`(x) is an SU(3) matrix representing the parallel transporter
//! along direction μ from site x.
//!
//! Links leave the manifold only inside an update's intermediate arithmetic;
//! every stored link passes through [`Su3Matrix::reunitarize`] first.
//!
//! Storage: row-major, 9 Complex64 values.
//!
//! # References
//!
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 2
//! - Creutz, "Quarks, Gluons and Lattices" (1983), Ch. 8

use std::ops::{Add, Mul, Sub};

use super::complex_f64::Complex64;
use super::constants::lcg_gaussian;
use crate::tolerances::DIVISION_GUARD;

/// 3×3 complex matrix: SU(3) link variable.
///
/// Row-major storage: `m[row][col]`.
#[derive(Clone, Copy, Debug)]
#[must_use]
pub struct Su3Matrix {
    /// Matrix elements m[row][col].
    pub m: [[Complex64; 3]; 3],
}

impl Mul for Su3Matrix {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                let mut s = Complex64::ZERO;
                for k in 0..3 {
                    s += self.m[i][k] * rhs.m[k][j];
                }
                r.m[i][j] = s;
            }
        }
        r
    }
}

impl Add for Su3Matrix {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[i][j] + rhs.m[i][j];
            }
        }
        r
    }
}

impl Sub for Su3Matrix {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[i][j] - rhs.m[i][j];
            }
        }
        r
    }
}

impl Su3Matrix {
    /// 3×3 identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [Complex64::ONE, Complex64::ZERO, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ONE, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ZERO, Complex64::ONE],
        ],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self {
        m: [[Complex64::ZERO; 3]; 3],
    };

    /// Conjugate transpose (adjoint / dagger).
    pub fn adjoint(self) -> Self {
        let mut r = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[j][i].conj();
            }
        }
        r
    }

    /// Trace.
    pub fn trace(self) -> Complex64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// Real part of the trace.
    #[must_use]
    pub fn re_trace(self) -> f64 {
        self.m[0][0].re + self.m[1][1].re + self.m[2][2].re
    }

    /// Determinant of a 3×3 complex matrix.
    pub fn det(self) -> Complex64 {
        let m = &self.m;
        let a = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]);
        let b = m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]);
        let c = m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        a - b + c
    }

    /// Scale by a real number.
    pub fn scale(self, s: f64) -> Self {
        let mut r = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[i][j].scale(s);
            }
        }
        r
    }

    /// Project back onto SU(3) via modified Gram-Schmidt reunitarization.
    ///
    /// This is the single projection through which every mutated link must
    /// pass: rows are orthonormalized and row 2 is rebuilt as the conjugate
    /// cross product, which fixes det = 1.
    pub fn reunitarize(self) -> Self {
        let mut u = self;

        // Normalize row 0
        let n0 = row_norm(&u, 0);
        if n0 > DIVISION_GUARD {
            let inv = 1.0 / n0;
            for j in 0..3 {
                u.m[0][j] = u.m[0][j].scale(inv);
            }
        }

        // Orthogonalize row 1 against row 0, then normalize
        let dot01 = row_dot(&u, 0, 1);
        for j in 0..3 {
            u.m[1][j] -= u.m[0][j] * dot01;
        }
        let n1 = row_norm(&u, 1);
        if n1 > DIVISION_GUARD {
            let inv = 1.0 / n1;
            for j in 0..3 {
                u.m[1][j] = u.m[1][j].scale(inv);
            }
        }

        // Row 2 = conj(row 0 × row 1), which enforces det = 1
        u.m[2][0] = (u.m[0][1] * u.m[1][2] - u.m[0][2] * u.m[1][1]).conj();
        u.m[2][1] = (u.m[0][2] * u.m[1][0] - u.m[0][0] * u.m[1][2]).conj();
        u.m[2][2] = (u.m[0][0] * u.m[1][1] - u.m[0][1] * u.m[1][0]).conj();

        u
    }

    /// Random SU(3) element near the identity.
    ///
    /// Projects I + ε·(G + iG') with unit Gaussian entries onto the manifold.
    /// Used to build weakly disordered fields in tests; the Metropolis
    /// proposal constructs its own perturbation so that the draw order of
    /// the shared stream matches the sweep definition.
    pub fn random_near_identity(seed: &mut u64, epsilon: f64) -> Self {
        let mut r = Self::IDENTITY;
        for row in &mut r.m {
            for cell in row.iter_mut() {
                cell.re += epsilon * lcg_gaussian(seed);
            }
        }
        for row in &mut r.m {
            for cell in row.iter_mut() {
                cell.im += epsilon * lcg_gaussian(seed);
            }
        }
        r.reunitarize()
    }

    /// Max-norm deviation of U†U from the identity.
    #[must_use]
    pub fn unitarity_error(self) -> f64 {
        let p = self * self.adjoint();
        let mut worst = 0.0_f64;
        for i in 0..3 {
            for j in 0..3 {
                let target = if i == j { Complex64::ONE } else { Complex64::ZERO };
                worst = worst.max((p.m[i][j] - target).abs_sq().sqrt());
            }
        }
        worst
    }
}

fn row_norm(u: &Su3Matrix, row: usize) -> f64 {
    let mut s = 0.0;
    for j in 0..3 {
        s += u.m[row][j].abs_sq();
    }
    s.sqrt()
}

fn row_dot(u: &Su3Matrix, r1: usize, r2: usize) -> Complex64 {
    let mut s = Complex64::ZERO;
    for j in 0..3 {
        s += u.m[r1][j].conj() * u.m[r2][j];
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{SU3_DET_ABS, SU3_UNITARITY_ABS};

    #[test]
    fn identity_properties() {
        let i = Su3Matrix::IDENTITY;
        assert!((i.det().re - 1.0).abs() < 1e-14);
        assert!(i.det().im.abs() < 1e-14);
        assert!((i.re_trace() - 3.0).abs() < 1e-14);
    }

    #[test]
    fn mul_identity() {
        let mut seed = 42u64;
        let u = Su3Matrix::random_near_identity(&mut seed, 0.3);
        let v = u * Su3Matrix::IDENTITY;
        for i in 0..3 {
            for j in 0..3 {
                assert!((v.m[i][j].re - u.m[i][j].re).abs() < 1e-12);
                assert!((v.m[i][j].im - u.m[i][j].im).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn projection_restores_unitarity_and_det() {
        // Large perturbations far off the manifold must come back clean.
        let mut seed = 123u64;
        for eps in [0.05, 0.3, 0.8, 1.5] {
            let u = Su3Matrix::random_near_identity(&mut seed, eps);
            assert!(
                u.unitarity_error() < SU3_UNITARITY_ABS,
                "U†U deviates from identity by {:.3e} at eps={eps}",
                u.unitarity_error()
            );
            let d = u.det();
            let det_err = ((d.re - 1.0).powi(2) + d.im.powi(2)).sqrt();
            assert!(
                det_err < SU3_DET_ABS,
                "|det U - 1| = {det_err:.3e} at eps={eps}"
            );
        }
    }

    #[test]
    fn projection_fixes_manual_drift() {
        let mut seed = 999u64;
        let mut u = Su3Matrix::random_near_identity(&mut seed, 0.5);
        u.m[0][0].re += 0.1;
        u.m[1][2].im -= 0.05;

        let fixed = u.reunitarize();
        assert!(fixed.unitarity_error() < SU3_UNITARITY_ABS);
    }

    #[test]
    fn adjoint_involution() {
        let mut seed = 7u64;
        let u = Su3Matrix::random_near_identity(&mut seed, 0.2);
        let back = u.adjoint().adjoint();
        for i in 0..3 {
            for j in 0..3 {
                assert!((back.m[i][j].re - u.m[i][j].re).abs() < 1e-14);
                assert!((back.m[i][j].im - u.m[i][j].im).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn product_stays_on_manifold() {
        let mut seed = 31u64;
        let a = Su3Matrix::random_near_identity(&mut seed, 0.4);
        let b = Su3Matrix::random_near_identity(&mut seed, 0.4);
        let p = a * b;
        // Products of SU(3) elements stay unitary up to rounding.
        assert!(p.unitarity_error() < 1e-12);
    }
}
