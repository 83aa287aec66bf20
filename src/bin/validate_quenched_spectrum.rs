// SPDX-License-Identifier: AGPL-3.0-only

//! Quenched spectrum validation: gauge sector identities, flow behavior,
//! and a minimal end-to-end ensemble run.
//!
//! # Validation targets
//!
//! | Observable | Expected | Basis |
//! |-----------|----------|-------|
//! | Cold plaquette | 1.0 | definition |
//! | Cold action | 0.0 | definition |
//! | Metropolis acceptance | > 5% | sampler sanity |
//! | t²E vs flow time | monotone rise | weak-coupling regime |
//! | End-to-end g²_GF | finite, > 0 | pipeline integrity |
//! | End-to-end α_MSbar | in (0, 1) | perturbative matching |

use latscale::lattice::ensemble::{run, EnsembleConfig};
use latscale::lattice::flow::t2_energy;
use latscale::lattice::metropolis::{run_sweeps, SweepConfig};
use latscale::lattice::su3::Su3Matrix;
use latscale::lattice::wilson::Lattice;
use latscale::tolerances;
use latscale::validation::ValidationHarness;

fn main() {
    println!("=== Quenched SU(3) spectrum validation ===");
    println!("Metropolis + Wilson flow + Wilson valence quarks");
    println!();

    let mut harness = ValidationHarness::new("quenched_spectrum");

    // --- cold start identities ---
    {
        let lat = Lattice::cold_start(4, 4, 6.0);
        let plaq = lat.average_plaquette();
        let action = lat.wilson_action();
        println!("cold plaquette: {plaq:.12}");
        println!("cold action:    {action:.3e}");
        harness.check_abs("cold plaquette", plaq, 1.0, tolerances::COLD_PLAQUETTE_ABS);
        harness.check_abs("cold action", action, 0.0, tolerances::COLD_ACTION_ABS);
    }

    // --- sampler sanity on a small volume ---
    {
        let mut lat = Lattice::cold_start(4, 4, 5.7);
        let mut seed = 42u64;
        let stats = run_sweeps(&mut lat, 5, &SweepConfig::default(), &mut seed);
        let plaq = lat.average_plaquette();
        println!(
            "after 5 sweeps at beta=5.7: plaquette={plaq:.6}, acceptance={:.1}%",
            stats.acceptance_rate() * 100.0
        );
        harness.check_lower(
            "Metropolis acceptance",
            stats.acceptance_rate(),
            tolerances::METROPOLIS_ACCEPTANCE_MIN,
        );
        harness.check_upper("plaquette below 1", plaq, 1.0);
        harness.check_lower("plaquette above -1", plaq, -1.0);
    }

    // --- flow monotonicity near the free field ---
    {
        let mut lat = Lattice::cold_start(2, 4, 6.0);
        let mut seed = 7u64;
        for link in &mut lat.links {
            *link = (*link * Su3Matrix::random_near_identity(&mut seed, 0.05)).reunitarize();
        }
        let mut prev = 0.0;
        let mut monotone = true;
        for t in [0.02, 0.04, 0.08] {
            let v = t2_energy(&lat, t, 8);
            println!("t={t:.2}: t2E={v:.6e}");
            monotone &= v > prev;
            prev = v;
        }
        harness.check_bool("t2E monotone in flow time", monotone);
    }

    // --- end-to-end minimal run ---
    {
        let mut cfg = EnsembleConfig::profile("demo").expect("demo profile");
        cfg.therm_sweeps = 0;
        cfg.sweeps = 1;
        cfg.every = 1;
        cfg.kappas = vec![0.120];
        cfg.seed = 0;

        let result = run(&cfg).expect("minimal run should complete");
        println!();
        println!(
            "{}",
            serde_json::to_string_pretty(&result).expect("result serializes")
        );

        harness.check_bool("one measurement taken", result.n_meas == 1);
        harness.check_finite("g2_GF finite", result.g2_gf);
        harness.check_lower("g2_GF positive", result.g2_gf, 0.0);
        harness.check_lower("alpha above 0", result.alpha_msbar, 0.0);
        harness.check_upper("alpha below 1", result.alpha_msbar, 1.0);
        harness.check_finite("aLambda finite", result.a_lambda_msbar);

        let ch = &result.channels[0];
        for (label, mass) in [
            ("pseudoscalar mass", ch.am_pseudoscalar),
            ("vector mass", ch.am_vector),
            ("baryon mass", ch.am_baryon),
        ] {
            // Finite or explicitly undefined, never infinite.
            harness.check_bool(&format!("{label} finite or NaN"), !mass.is_infinite());
        }
        harness.check_bool("solver diagnostics present", ch.cg_max_iterations > 0);
    }

    // --- demo profile with two hopping parameters ---
    {
        let cfg = EnsembleConfig::profile("demo").expect("demo profile");
        let result = run(&cfg).expect("demo run should complete");
        println!(
            "demo profile: n_meas={}, g2_GF={:.4}, aLambda={:.4e}",
            result.n_meas, result.g2_gf, result.a_lambda_msbar
        );
        harness.check_bool("two kappa channels", result.channels.len() == 2);
        harness.check_bool("chiral block present", result.chiral.is_some());
    }

    harness.finish();
}
