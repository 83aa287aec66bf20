// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: the ensemble driver end-to-end through the public API.
//!
//! All runs use demo-scale volumes (2³×4) so the full pipeline, including
//! 12 CG solves per propagator, stays fast enough for routine test runs.

use latscale::error::LatScaleError;
use latscale::lattice::ensemble::{run, EnsembleConfig};

fn minimal_config() -> EnsembleConfig {
    let mut cfg = EnsembleConfig::profile("demo").expect("demo profile");
    cfg.therm_sweeps = 0;
    cfg.sweeps = 1;
    cfg.every = 1;
    cfg.kappas = vec![0.120];
    cfg.seed = 0;
    cfg
}

#[test]
fn minimal_run_terminates_with_physical_scale() {
    let result = run(&minimal_config()).expect("run should complete");

    assert_eq!(result.n_meas, 1);
    assert!(result.g2_gf.is_finite() && result.g2_gf > 0.0, "g2={}", result.g2_gf);
    assert!(
        result.alpha_msbar > 0.0 && result.alpha_msbar < 1.0,
        "alpha={}",
        result.alpha_msbar
    );
    assert!(result.a_lambda_msbar.is_finite());
    assert!((result.mu_lattice - 1.0 / (0.3 * 2.0)).abs() < 1e-12);

    assert_eq!(result.channels.len(), 1);
    let ch = &result.channels[0];
    for mass in [ch.am_pseudoscalar, ch.am_vector, ch.am_baryon] {
        assert!(!mass.is_infinite(), "masses are finite or NaN, never infinite");
    }
    assert!(ch.cg_max_iterations > 0, "solver diagnostics should be filled");
    assert!(result.chiral.is_none(), "single kappa has no chiral block");
}

#[test]
fn demo_profile_produces_chiral_block() {
    let result = run(&EnsembleConfig::profile("demo").expect("profile")).expect("demo run");
    assert_eq!(result.n_meas, 2);
    assert_eq!(result.channels.len(), 2);
    let chiral = result.chiral.expect("two kappas give a chiral block");
    assert!(!chiral.am_baryon.is_infinite());
    assert!(!chiral.am_vector.is_infinite());
}

#[test]
fn runs_are_deterministic_given_a_seed() {
    let a = run(&minimal_config()).expect("first run");
    let b = run(&minimal_config()).expect("second run");

    assert!((a.g2_gf - b.g2_gf).abs() < f64::EPSILON);
    assert!((a.alpha_msbar - b.alpha_msbar).abs() < f64::EPSILON);
    let (ca, cb) = (&a.channels[0], &b.channels[0]);
    assert_eq!(ca.cg_max_iterations, cb.cg_max_iterations);
    let same_mass = (ca.am_pseudoscalar - cb.am_pseudoscalar).abs() < f64::EPSILON
        || (ca.am_pseudoscalar.is_nan() && cb.am_pseudoscalar.is_nan());
    assert!(same_mass, "pseudoscalar mass must reproduce bit-for-bit");
}

#[test]
fn different_seeds_decorrelate_the_ensemble() {
    let a = run(&minimal_config()).expect("seed 0 run");
    let mut cfg = minimal_config();
    cfg.seed = 1234;
    let b = run(&cfg).expect("seed 1234 run");
    assert!(
        (a.g2_gf - b.g2_gf).abs() > 0.0,
        "different seeds should give different couplings"
    );
}

#[test]
fn result_record_serializes_to_flat_json() {
    let result = run(&minimal_config()).expect("run");
    let value = serde_json::to_value(&result).expect("serialize");

    for key in [
        "beta",
        "l",
        "t",
        "n_f",
        "c_flow",
        "n_meas",
        "g2_gf",
        "alpha_msbar",
        "mu_lattice",
        "a_lambda_msbar",
        "channels",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert!(
        value.get("chiral").is_none(),
        "chiral block must be skipped with one kappa"
    );
    let channels = value["channels"].as_array().expect("channels array");
    assert!(channels[0].get("ratio_baryon").is_some());
    assert!(channels[0].get("cg_worst_residual_sq").is_some());
}

#[test]
fn zero_measurement_configuration_is_fatal() {
    let mut cfg = minimal_config();
    cfg.sweeps = 2;
    cfg.every = 3;
    match run(&cfg) {
        Err(LatScaleError::NoMeasurements { sweeps, every }) => {
            assert_eq!((sweeps, every), (2, 3));
        }
        other => panic!("expected NoMeasurements, got {other:?}"),
    }
}
