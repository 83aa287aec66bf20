// SPDX-License-Identifier: AGPL-3.0-only

//! Scale-setting validation: MS-bar running, Λ↔α round trips, and the
//! gradient-flow matching layer.
//!
//! # Validation targets
//!
//! | Observable | Expected | Basis |
//! |-----------|----------|-------|
//! | β₀, β₁ at n_f=0 | 11, 102 | van Ritbergen et al. (1997) |
//! | 2-loop Λ | closed form | textbook definition |
//! | Λ⁽⁵⁾ from α_s(M_Z) | ~0.21 GeV | PDG world average |
//! | α round trip | 1e-6 rel | bisection bracket width |
//! | δ(c=0.3) | ≈ −(π²/3)·0.3⁴ + θ-term | Fodor et al. (2012) |

use latscale::lattice::flow::{delta_tree, theta3};
use latscale::msbar;
use latscale::tolerances;
use latscale::validation::ValidationHarness;

fn main() {
    println!("=== Scale setting validation ===");
    println!("4-loop MS-bar running + gradient-flow matching");
    println!();

    let mut harness = ValidationHarness::new("scale_setting");

    // --- beta coefficients ---
    let [b0, b1, b2, b3] = msbar::beta_coeffs(0);
    println!("n_f=0 beta coefficients: {b0:.1}, {b1:.1}, {b2:.2}, {b3:.2}");
    harness.check_abs("beta0 quenched", b0, 11.0, 1e-12);
    harness.check_abs("beta1 quenched", b1, 102.0, 1e-12);
    harness.check_abs("beta2 quenched", b2, 1428.5, 1e-9);
    harness.check_lower("beta3 quenched positive", b3, 0.0);

    // --- 2-loop closed form ---
    {
        let mu = 5.0;
        let alpha = 0.15;
        let a = alpha / (4.0 * std::f64::consts::PI);
        let [c0, c1, ..] = msbar::beta_coeffs(3);
        let closed = mu * (-0.5 / (c0 * a)).exp() * (c0 * a).powf(-c1 / (2.0 * c0 * c0));
        let lam = msbar::lambda_from_alpha(mu, alpha, 3, 2).expect("2-loop lambda");
        println!("2-loop check: integral {lam:.8}, closed form {closed:.8}");
        harness.check_rel("2-loop closed form", lam, closed, 1e-12);
    }

    // --- physical sanity ---
    {
        let lam5 = msbar::lambda_from_alpha(91.1876, 0.1181, 5, 4).expect("lambda5");
        println!("Lambda^(5) from alpha_s(M_Z): {lam5:.4} GeV");
        harness.check_lower("Lambda5 lower", lam5, 0.17);
        harness.check_upper("Lambda5 upper", lam5, 0.25);
    }

    // --- round trips over loop orders and flavor counts ---
    for loops in 1..=4u32 {
        for &n_f in &[0u32, 3, 4, 5] {
            let mu = 10.0;
            let alpha = 0.2;
            let lam = msbar::lambda_from_alpha(mu, alpha, n_f, loops).expect("lambda");
            let back = msbar::alpha_from_lambda(mu, lam, n_f, loops).expect("alpha back");
            harness.check_rel(
                &format!("round trip loops={loops} nf={n_f}"),
                back,
                alpha,
                tolerances::RG_ROUNDTRIP_REL,
            );
        }
    }

    // --- domain validation fails fast ---
    harness.check_bool(
        "negative mu rejected",
        msbar::lambda_from_alpha(-1.0, 0.1, 0, 4).is_err(),
    );
    harness.check_bool(
        "loop order 5 rejected",
        msbar::lambda_from_alpha(1.0, 0.1, 0, 5).is_err(),
    );
    harness.check_bool(
        "nonpositive g2 rejected",
        msbar::alpha_msbar_from_g2(0.0, 0).is_err(),
    );

    // --- gradient-flow matching ---
    {
        let (k1, k2) = msbar::k1_k2(0);
        println!("matching coefficients (quenched): k1={k1:.6}, k2={k2:.6}");
        harness.check_abs("k1 quenched", k1, 8.0 * 0.045_741_114 * 3.0, 1e-12);
        harness.check_upper("k2 quenched negative", k2, 0.0);

        let alpha = 0.2;
        let g2 = 4.0 * std::f64::consts::PI * alpha * (1.0 + k1 * alpha + k2 * alpha * alpha);
        let back = msbar::alpha_msbar_from_g2(g2, 0).expect("matching inversion");
        harness.check_rel(
            "matching inversion",
            back,
            alpha,
            tolerances::MATCHING_RESIDUAL_REL,
        );
    }

    // --- finite-volume correction pieces ---
    {
        let th = theta3(0.1);
        let expected = 1.0 + 2.0 * (0.1 + 0.1_f64.powi(4) + 0.1_f64.powi(9) + 0.1_f64.powi(16));
        harness.check_abs("theta3(0.1)", th, expected, 1e-12);

        let c = 0.3;
        let d = delta_tree(c);
        println!("delta(c=0.3) = {d:.6e}");
        harness.check_upper("delta(0.3) below zero", d, 0.0);
        let poly = -(std::f64::consts::PI.powi(2) / 3.0) * c.powi(4);
        // The theta correction at c=0.3 is ~1.2e-4, on top of the c⁴ term.
        harness.check_abs("delta(0.3) near polynomial term", d, poly, 5e-4);
    }

    harness.finish();
}
