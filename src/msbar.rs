// SPDX-License-Identifier: AGPL-3.0-only

//! MS-bar running coupling and the RG-invariant scale Λ.
//!
//! With a := α_s/(4π) and the MS-bar β function
//!
//!   da/dln μ² = −β₀a² − β₁a³ − β₂a⁴ − β₃a⁵ − ...
//!
//! the scale Λ is defined through the subtracted small-coupling integral
//!
//!   ln(μ²/Λ²) = 1/(β₀a) + (β₁/β₀²)·ln(β₀a)
//!             + ∫₀ᵃ dx [ 1/β(x) + 1/(β₀x²) − β₁/(β₀²x) ]
//!
//! The bracketed integrand is finite as x → 0 because both singular pieces
//! are subtracted; at 2 loops the integral vanishes and the familiar closed
//! form is recovered. This is the conventional Λ_MSbar: a definition, not a
//! fit, once scheme and truncation order are chosen.
//!
//! Also provided: the NNLO matching between the finite-volume gradient-flow
//! coupling and α_MSbar at μ = 1/√(8t),
//! g²_GF = 4πα(1 + k₁α + k₂α²).
//!
//! # References
//!
//! - van Ritbergen, Vermaseren & Larin, PLB 400, 379 (1997): 4-loop β
//! - Harlander & Neumann, JHEP 1606, 161 (2016): k₁, k₂

use crate::error::LatScaleError;

/// ζ(3), appearing in the 4-loop coefficient.
const ZETA3: f64 = 1.202_056_903_159_594_3;

/// Simpson panels for the subtracted integral; cheap and converged far
/// below the round-trip tolerance.
const SIMPSON_PANELS: usize = 20_000;

/// Casimir and trace normalization constants of SU(3).
const CA: f64 = 3.0;
const CF: f64 = 4.0 / 3.0;
const TR: f64 = 0.5;

/// MS-bar β coefficients (β₀, β₁, β₂, β₃) for SU(3) with `n_f` flavors.
#[must_use]
pub fn beta_coeffs(n_f: u32) -> [f64; 4] {
    let nf = f64::from(n_f);
    let b0 = 11.0 - (2.0 / 3.0) * nf;
    let b1 = 102.0 - (38.0 / 3.0) * nf;
    let b2 = 2857.0 / 2.0 - (5033.0 / 18.0) * nf + (325.0 / 54.0) * nf * nf;
    let b3 = 149_753.0 / 6.0 + 3564.0 * ZETA3
        + (-1_078_361.0 / 162.0 - (6508.0 / 27.0) * ZETA3) * nf
        + (50_065.0 / 162.0 + (6472.0 / 81.0) * ZETA3) * nf * nf
        + (1093.0 / 729.0) * nf * nf * nf;
    [b0, b1, b2, b3]
}

/// β(a) = da/dln μ² truncated at `loops`.
fn beta_a(a: f64, coeffs: &[f64; 4], loops: u32) -> f64 {
    let mut out = -coeffs[0] * a * a;
    if loops >= 2 {
        out -= coeffs[1] * a.powi(3);
    }
    if loops >= 3 {
        out -= coeffs[2] * a.powi(4);
    }
    if loops >= 4 {
        out -= coeffs[3] * a.powi(5);
    }
    out
}

/// Composite Simpson rule on [a, b] with an even panel count.
fn simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, n: usize) -> f64 {
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;
    let mut s = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        s += f(x) * if i % 2 == 1 { 4.0 } else { 2.0 };
    }
    s * h / 3.0
}

fn validate_loops(loops: u32) -> Result<(), LatScaleError> {
    if (1..=4).contains(&loops) {
        Ok(())
    } else {
        Err(LatScaleError::LoopOrderOutOfRange(loops))
    }
}

fn validate_positive(what: &'static str, value: f64) -> Result<(), LatScaleError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(LatScaleError::InvalidDomain { what, value })
    }
}

/// Λ_MSbar^(n_f) from α_s(μ), by the subtracted-integral definition.
///
/// `mu` and the result share units; on the lattice μ is in units of 1/a.
pub fn lambda_from_alpha(
    mu: f64,
    alpha: f64,
    n_f: u32,
    loops: u32,
) -> Result<f64, LatScaleError> {
    validate_positive("mu", mu)?;
    validate_positive("alpha", alpha)?;
    validate_loops(loops)?;

    let a = alpha / (4.0 * std::f64::consts::PI);
    let coeffs = beta_coeffs(n_f);
    let [b0, b1, ..] = coeffs;

    // 1- and 2-loop closed pieces of ln(μ²/Λ²).
    let mut f = 1.0 / (b0 * a);
    if loops >= 2 {
        f += (b1 / (b0 * b0)) * (b0 * a).ln();
    }

    if loops >= 3 {
        // Finite subtracted integral; start at ε to dodge the removable
        // singularity in floating arithmetic.
        let eps = (a * 1e-6).max(1e-8);
        let integrand = |x: f64| {
            1.0 / beta_a(x, &coeffs, loops) + 1.0 / (b0 * x * x) - (b1 / (b0 * b0)) / x
        };
        f += simpson(&integrand, eps, a, SIMPSON_PANELS);
    }

    Ok(mu * (-0.5 * f).exp())
}

/// α_s(μ) from Λ_MSbar^(n_f), by monotone bisection.
///
/// The bracket starts at [10⁻⁴, 1] and the upper edge grows by ×1.5 up to
/// 30 times; failure to bracket is a hard error.
pub fn alpha_from_lambda(
    mu: f64,
    lambda: f64,
    n_f: u32,
    loops: u32,
) -> Result<f64, LatScaleError> {
    validate_positive("mu", mu)?;
    validate_positive("lambda", lambda)?;
    validate_loops(loops)?;

    let mut lo = 1e-4;
    let mut hi = 1.0;
    let mut f_lo = lambda_from_alpha(mu, lo, n_f, loops)? - lambda;
    let mut f_hi = lambda_from_alpha(mu, hi, n_f, loops)? - lambda;

    let mut expansions = 0;
    while f_lo * f_hi > 0.0 && expansions < 30 {
        hi *= 1.5;
        f_hi = lambda_from_alpha(mu, hi, n_f, loops)? - lambda;
        expansions += 1;
    }
    if f_lo * f_hi > 0.0 {
        return Err(LatScaleError::BracketingFailure(format!(
            "alpha inversion found no bracket for mu={mu}, lambda={lambda}, n_f={n_f}"
        )));
    }

    for _ in 0..80 {
        let mid = 0.5 * (lo + hi);
        let f_mid = lambda_from_alpha(mu, mid, n_f, loops)? - lambda;
        if f_lo * f_mid > 0.0 {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// NNLO matching coefficients for t²⟨E(t)⟩ at μ = 1/√(8t):
/// g²_GF = 4πα(1 + k₁α + k₂α²).
#[must_use]
pub fn k1_k2(n_f: u32) -> (f64, f64) {
    let nf = f64::from(n_f);
    let k1 = 8.0 * (0.045_741_114 * CA + 0.001_888_798 * TR * nf);
    let k2 = 8.0
        * (-0.013_642_3 * CA * CA
            + TR * nf * (0.006_440_134 * CF - 0.008_688_4 * CA)
            + TR * TR * nf * nf * 0.000_936_117);
    (k1, k2)
}

/// Invert g²_GF = 4πα(1 + k₁α + k₂α²) for α by Newton iteration.
pub fn alpha_msbar_from_g2(g2_gf: f64, n_f: u32) -> Result<f64, LatScaleError> {
    validate_positive("g2_gf", g2_gf)?;
    let (k1, k2) = k1_k2(n_f);
    let y = g2_gf / (4.0 * std::f64::consts::PI);

    let mut a = y.max(1e-8);
    for _ in 0..50 {
        let f = a * (1.0 + k1 * a + k2 * a * a) - y;
        let df = 1.0 + 2.0 * k1 * a + 3.0 * k2 * a * a;
        let step = f / df;
        let mut next = a - step;
        if next <= 0.0 {
            next = a * 0.5;
        }
        if step.abs() < 1e-14 {
            break;
        }
        a = next;
    }
    Ok(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{MATCHING_RESIDUAL_REL, RG_ROUNDTRIP_REL};

    #[test]
    fn beta_coefficients_known_values() {
        let [b0, b1, b2, _] = beta_coeffs(0);
        assert!((b0 - 11.0).abs() < 1e-12);
        assert!((b1 - 102.0).abs() < 1e-12);
        assert!((b2 - 1428.5).abs() < 1e-9);

        let [b0_3, b1_3, ..] = beta_coeffs(3);
        assert!((b0_3 - 9.0).abs() < 1e-12);
        assert!((b1_3 - 64.0).abs() < 1e-12);
    }

    #[test]
    fn one_loop_matches_closed_form() {
        let mu = 10.0;
        let alpha = 0.2;
        let a = alpha / (4.0 * std::f64::consts::PI);
        let [b0, ..] = beta_coeffs(0);
        let expected = mu * (-0.5 / (b0 * a)).exp();
        let got = lambda_from_alpha(mu, alpha, 0, 1).unwrap();
        assert!(((got - expected) / expected).abs() < 1e-14);
    }

    #[test]
    fn two_loop_matches_closed_form() {
        // Λ = μ exp(−1/(2β₀a)) (β₀a)^(−β₁/(2β₀²))
        let mu = 5.0;
        let alpha = 0.15;
        let n_f = 3;
        let a = alpha / (4.0 * std::f64::consts::PI);
        let [b0, b1, ..] = beta_coeffs(n_f);
        let expected = mu * (-0.5 / (b0 * a)).exp() * (b0 * a).powf(-b1 / (2.0 * b0 * b0));
        let got = lambda_from_alpha(mu, alpha, n_f, 2).unwrap();
        assert!(((got - expected) / expected).abs() < 1e-12);
    }

    #[test]
    fn lambda_increases_with_alpha() {
        let mut prev = 0.0;
        for alpha in [0.05, 0.1, 0.2, 0.3] {
            let lam = lambda_from_alpha(10.0, alpha, 0, 4).unwrap();
            assert!(lam > prev, "Λ should grow with α: {lam} after {prev}");
            prev = lam;
        }
    }

    #[test]
    fn world_average_alpha_gives_physical_lambda5() {
        // α_s(M_Z) = 0.1181 with n_f = 5 at 4 loops gives Λ⁽⁵⁾ ≈ 0.21 GeV.
        let lam = lambda_from_alpha(91.1876, 0.1181, 5, 4).unwrap();
        assert!(
            (0.17..0.25).contains(&lam),
            "Λ⁽⁵⁾ = {lam} GeV outside the physical window"
        );
    }

    #[test]
    fn round_trip_over_loops_and_flavors() {
        let mus = [1.0, 10.0, 1.0e3, 1.0e4];
        let alphas = [0.05, 0.12, 0.2, 0.3];
        for loops in 1..=4u32 {
            for (i, &n_f) in [0u32, 3, 4, 5].iter().enumerate() {
                let mu = mus[i];
                let alpha = alphas[(i + loops as usize) % alphas.len()];
                let lam = lambda_from_alpha(mu, alpha, n_f, loops).unwrap();
                let back = alpha_from_lambda(mu, lam, n_f, loops).unwrap();
                assert!(
                    ((back - alpha) / alpha).abs() < RG_ROUNDTRIP_REL,
                    "round trip failed at loops={loops}, n_f={n_f}: {alpha} -> {back}"
                );
            }
        }
    }

    #[test]
    fn domain_validation_fails_fast() {
        assert!(matches!(
            lambda_from_alpha(-1.0, 0.1, 0, 4),
            Err(LatScaleError::InvalidDomain { what: "mu", .. })
        ));
        assert!(matches!(
            lambda_from_alpha(1.0, 0.0, 0, 4),
            Err(LatScaleError::InvalidDomain { what: "alpha", .. })
        ));
        assert!(matches!(
            lambda_from_alpha(1.0, 0.1, 0, 0),
            Err(LatScaleError::LoopOrderOutOfRange(0))
        ));
        assert!(matches!(
            lambda_from_alpha(1.0, 0.1, 0, 5),
            Err(LatScaleError::LoopOrderOutOfRange(5))
        ));
        assert!(matches!(
            alpha_from_lambda(1.0, -0.2, 0, 4),
            Err(LatScaleError::InvalidDomain { what: "lambda", .. })
        ));
    }

    #[test]
    fn matching_coefficients_quenched() {
        let (k1, k2) = k1_k2(0);
        assert!((k1 - 8.0 * 0.045_741_114 * 3.0).abs() < 1e-12);
        assert!(k2 < 0.0, "quenched k₂ is negative, got {k2}");
    }

    #[test]
    fn matching_inversion_round_trip() {
        for n_f in [0u32, 3] {
            let (k1, k2) = k1_k2(n_f);
            for alpha in [0.05, 0.15, 0.3] {
                let g2 = 4.0 * std::f64::consts::PI * alpha * (1.0 + k1 * alpha + k2 * alpha * alpha);
                let back = alpha_msbar_from_g2(g2, n_f).unwrap();
                assert!(
                    ((back - alpha) / alpha).abs() < MATCHING_RESIDUAL_REL,
                    "matching inversion failed at n_f={n_f}, alpha={alpha}: got {back}"
                );
            }
        }
    }

    #[test]
    fn matching_rejects_nonpositive_coupling() {
        assert!(matches!(
            alpha_msbar_from_g2(0.0, 0),
            Err(LatScaleError::InvalidDomain { what: "g2_gf", .. })
        ));
    }
}
