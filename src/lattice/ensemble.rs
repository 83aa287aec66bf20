// SPDX-License-Identifier: AGPL-3.0-only

//! Ensemble driver: thermalize, measure on a fixed cadence, reduce.
//!
//! The run proceeds through fixed stages:
//!
//! 1. **Init**: allocate a cold (identity) gauge field.
//! 2. **Thermalize**: a fixed number of Metropolis sweeps, no measurement.
//! 3. **Measure loop**: sweep; every `every`-th sweep, measure the
//!    gradient-flow scale and, per hopping parameter, a point propagator
//!    with all three hadron correlators. Scale and hadron measurements
//!    read immutable clones/snapshots of the field; only the sweep mutates
//!    it.
//! 4. **Reduce**: ensemble averages, effective masses, ratios to the
//!    RG-invariant scale, and (with ≥2 κ) a linear chiral extrapolation in
//!    the squared pseudoscalar mass.
//!
//! A run that takes zero measurements is a configuration error and fails;
//! undefined effective masses are data, not errors, and propagate as NaN.

use serde::Serialize;

use super::correlator::{
    effective_mass, pion_correlator, proton_correlator_direct, rho_correlator,
};
use super::flow::{gradient_flow_coupling, FlowConfig};
use super::gamma::GammaSet;
use super::metropolis::{metropolis_sweep, run_sweeps, SweepConfig};
use super::propagator::{point_propagator, PropagatorStats};
use super::wilson::Lattice;
use crate::error::LatScaleError;
use crate::msbar;
use crate::tolerances::{CG_MAX_ITER, CG_TOLERANCE, CHIRAL_DENOMINATOR_GUARD};

/// Full configuration of one ensemble run.
///
/// Named profiles supply canned bundles; callers override individual
/// fields by plain struct mutation before calling [`run`].
#[derive(Clone, Debug)]
pub struct EnsembleConfig {
    /// Inverse bare gauge coupling β.
    pub beta: f64,
    /// Spatial extent L.
    pub l: usize,
    /// Temporal extent T.
    pub t: usize,
    /// Thermalization sweeps before any measurement.
    pub therm_sweeps: usize,
    /// Measurement-phase sweeps.
    pub sweeps: usize,
    /// Measurement stride: measure after every `every`-th sweep.
    pub every: usize,
    /// Seed of the shared random stream.
    pub seed: u64,
    /// Valence hopping parameters κ.
    pub kappas: Vec<f64>,
    /// Active flavors for the MS-bar running.
    pub n_f: u32,
    /// Gradient-flow scale parameter c.
    pub c_flow: f64,
    /// Flow integrator target step size.
    pub eps_flow: f64,
    /// Explicit flow step count override.
    pub n_flow_steps: Option<usize>,
    /// Perturbative loop order for Λ extraction.
    pub loops: u32,
    /// Metropolis proposal spread.
    pub metropolis_step: f64,
    /// CG absolute residual tolerance.
    pub cg_tol: f64,
    /// CG iteration cap per solve.
    pub cg_max_iter: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            beta: 5.7,
            l: 4,
            t: 8,
            therm_sweeps: 10,
            sweeps: 30,
            every: 5,
            seed: 0,
            kappas: vec![0.120, 0.125],
            n_f: 0,
            c_flow: 0.3,
            eps_flow: 0.01,
            n_flow_steps: None,
            loops: 4,
            metropolis_step: 0.24,
            cg_tol: CG_TOLERANCE,
            cg_max_iter: CG_MAX_ITER,
        }
    }
}

impl EnsembleConfig {
    /// A canned configuration bundle by name: `demo`, `quick`, or `serious`.
    pub fn profile(name: &str) -> Result<Self, LatScaleError> {
        match name {
            "demo" => Ok(Self {
                l: 2,
                t: 4,
                therm_sweeps: 1,
                sweeps: 2,
                every: 1,
                eps_flow: 0.05,
                ..Self::default()
            }),
            "quick" => Ok(Self::default()),
            "serious" => Ok(Self {
                beta: 5.8,
                l: 6,
                t: 12,
                therm_sweeps: 50,
                sweeps: 200,
                every: 10,
                ..Self::default()
            }),
            other => Err(LatScaleError::UnknownProfile(other.to_string())),
        }
    }

    fn validate(&self) -> Result<(), LatScaleError> {
        if self.l == 0 {
            return Err(LatScaleError::InvalidDomain {
                what: "l",
                value: 0.0,
            });
        }
        if self.t == 0 {
            return Err(LatScaleError::InvalidDomain {
                what: "t",
                value: 0.0,
            });
        }
        if self.every == 0 {
            return Err(LatScaleError::InvalidDomain {
                what: "every",
                value: 0.0,
            });
        }
        if self.kappas.is_empty() {
            return Err(LatScaleError::InvalidDomain {
                what: "kappas",
                value: 0.0,
            });
        }
        if !(1..=4).contains(&self.loops) {
            return Err(LatScaleError::LoopOrderOutOfRange(self.loops));
        }
        Ok(())
    }
}

/// Per-hopping-parameter channel masses and diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct KappaMasses {
    /// Hopping parameter κ.
    pub kappa: f64,
    /// Pseudoscalar effective mass am_π (NaN when undefined).
    pub am_pseudoscalar: f64,
    /// Vector effective mass am_ρ.
    pub am_vector: f64,
    /// Baryon effective mass am_p.
    pub am_baryon: f64,
    /// am_π / aΛ.
    pub ratio_pseudoscalar: f64,
    /// am_ρ / aΛ.
    pub ratio_vector: f64,
    /// am_p / aΛ.
    pub ratio_baryon: f64,
    /// Largest CG iteration count over all solves at this κ.
    pub cg_max_iterations: usize,
    /// Largest final squared residual over all solves at this κ.
    pub cg_worst_residual_sq: f64,
    /// Whether every solve at this κ met tolerance.
    pub cg_all_converged: bool,
}

/// Chiral-limit extrapolation, present only with ≥2 hopping parameters.
#[derive(Clone, Debug, Serialize)]
pub struct ChiralExtrapolation {
    /// Baryon mass at vanishing pseudoscalar mass squared.
    pub am_baryon: f64,
    /// Extrapolated baryon ratio to aΛ.
    pub ratio_baryon: f64,
    /// Vector mass at vanishing pseudoscalar mass squared.
    pub am_vector: f64,
    /// Extrapolated vector ratio to aΛ.
    pub ratio_vector: f64,
}

/// Final record of one ensemble run.
#[derive(Clone, Debug, Serialize)]
pub struct EnsembleResult {
    /// Inverse bare coupling.
    pub beta: f64,
    /// Spatial extent.
    pub l: usize,
    /// Temporal extent.
    pub t: usize,
    /// Active flavors.
    pub n_f: u32,
    /// Flow scale parameter.
    pub c_flow: f64,
    /// Measurements taken.
    pub n_meas: usize,
    /// Ensemble-averaged gradient-flow coupling.
    pub g2_gf: f64,
    /// Ensemble-averaged α_MSbar at the flow reference scale.
    pub alpha_msbar: f64,
    /// Reference scale μ = 1/(cL) in lattice units.
    pub mu_lattice: f64,
    /// Ensemble-averaged aΛ_MSbar.
    pub a_lambda_msbar: f64,
    /// Per-κ channel results.
    pub channels: Vec<KappaMasses>,
    /// Chiral extrapolation (≥2 κ only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chiral: Option<ChiralExtrapolation>,
}

/// Linear extrapolation to x = 0 through (x₁, y₁), (x₂, y₂):
/// m₀ = (y₁x₂ − y₂x₁)/(x₂ − x₁).
#[must_use]
pub fn chiral_extrapolate(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y1 * x2 - y2 * x1) / (x2 - x1)
}

fn ratio_to_scale(mass: f64, a_lambda: f64) -> f64 {
    if a_lambda > 0.0 && mass.is_finite() {
        mass / a_lambda
    } else {
        f64::NAN
    }
}

/// Run one full ensemble: thermalize, measure, reduce.
pub fn run(config: &EnsembleConfig) -> Result<EnsembleResult, LatScaleError> {
    config.validate()?;

    let gammas = GammaSet::euclidean();
    let sweep_cfg = SweepConfig {
        step: config.metropolis_step,
    };
    let flow_cfg = FlowConfig {
        c: config.c_flow,
        eps: config.eps_flow,
        n_steps: config.n_flow_steps,
    };
    let n_kappa = config.kappas.len();

    let mut seed = config.seed;
    let mut lattice = Lattice::cold_start(config.l, config.t, config.beta);

    run_sweeps(&mut lattice, config.therm_sweeps, &sweep_cfg, &mut seed);

    // Accumulators, owned here and fed only from the sequential loop.
    let mut g2_sum = 0.0;
    let mut alpha_sum = 0.0;
    let mut lambda_sum = 0.0;
    let mut corr_pi = vec![vec![0.0; config.t]; n_kappa];
    let mut corr_rho = vec![vec![0.0; config.t]; n_kappa];
    let mut corr_p = vec![vec![0.0; config.t]; n_kappa];
    let mut solver_stats = vec![
        PropagatorStats {
            all_converged: true,
            ..Default::default()
        };
        n_kappa
    ];
    let mut n_meas = 0usize;

    let mu_lattice = 1.0 / (config.c_flow * config.l as f64);

    for sw in 1..=config.sweeps {
        metropolis_sweep(&mut lattice, &sweep_cfg, &mut seed);
        if sw % config.every != 0 {
            continue;
        }

        // Scale measurement on a flowed clone; the sampler's field is
        // untouched.
        let flowed = gradient_flow_coupling(&lattice, &flow_cfg);
        let alpha = msbar::alpha_msbar_from_g2(flowed.g2, config.n_f)?;
        let a_lambda = msbar::lambda_from_alpha(mu_lattice, alpha, config.n_f, config.loops)?;
        g2_sum += flowed.g2;
        alpha_sum += alpha;
        lambda_sum += a_lambda;

        // Hadron measurements per κ on the same configuration.
        for (i, &kappa) in config.kappas.iter().enumerate() {
            let (prop, stats) = point_propagator(
                &lattice,
                &gammas,
                kappa,
                [0, 0, 0, 0],
                config.cg_tol,
                config.cg_max_iter,
            );
            accumulate(&mut corr_pi[i], &pion_correlator(&lattice, &prop));
            accumulate(&mut corr_rho[i], &rho_correlator(&lattice, &prop, &gammas));
            accumulate(&mut corr_p[i], &proton_correlator_direct(&lattice, &prop, &gammas));

            let agg = &mut solver_stats[i];
            agg.max_iterations = agg.max_iterations.max(stats.max_iterations);
            agg.worst_residual_sq = agg.worst_residual_sq.max(stats.worst_residual_sq);
            agg.all_converged &= stats.all_converged;
        }
        n_meas += 1;
    }

    if n_meas == 0 {
        return Err(LatScaleError::NoMeasurements {
            sweeps: config.sweeps,
            every: config.every,
        });
    }

    let norm = n_meas as f64;
    let a_lambda = lambda_sum / norm;

    let mut channels = Vec::with_capacity(n_kappa);
    for (i, &kappa) in config.kappas.iter().enumerate() {
        let avg = |c: &[f64]| -> Vec<f64> { c.iter().map(|v| v / norm).collect() };
        let am_pi = effective_mass(&avg(&corr_pi[i]));
        let am_rho = effective_mass(&avg(&corr_rho[i]));
        let am_p = effective_mass(&avg(&corr_p[i]));

        channels.push(KappaMasses {
            kappa,
            am_pseudoscalar: am_pi,
            am_vector: am_rho,
            am_baryon: am_p,
            ratio_pseudoscalar: ratio_to_scale(am_pi, a_lambda),
            ratio_vector: ratio_to_scale(am_rho, a_lambda),
            ratio_baryon: ratio_to_scale(am_p, a_lambda),
            cg_max_iterations: solver_stats[i].max_iterations,
            cg_worst_residual_sq: solver_stats[i].worst_residual_sq,
            cg_all_converged: solver_stats[i].all_converged,
        });
    }

    let chiral = if n_kappa >= 2 {
        let x1 = channels[0].am_pseudoscalar.powi(2);
        let x2 = channels[1].am_pseudoscalar.powi(2);
        if x1.is_finite() && x2.is_finite() {
            if (x2 - x1).abs() <= CHIRAL_DENOMINATOR_GUARD {
                return Err(LatScaleError::DegenerateChiralPoint { x1, x2 });
            }
            let am_baryon = chiral_extrapolate(x1, channels[0].am_baryon, x2, channels[1].am_baryon);
            let am_vector = chiral_extrapolate(x1, channels[0].am_vector, x2, channels[1].am_vector);
            Some(ChiralExtrapolation {
                am_baryon,
                ratio_baryon: ratio_to_scale(am_baryon, a_lambda),
                am_vector,
                ratio_vector: ratio_to_scale(am_vector, a_lambda),
            })
        } else {
            // Undefined pion masses propagate; the record still reports
            // every other field.
            Some(ChiralExtrapolation {
                am_baryon: f64::NAN,
                ratio_baryon: f64::NAN,
                am_vector: f64::NAN,
                ratio_vector: f64::NAN,
            })
        }
    } else {
        None
    };

    Ok(EnsembleResult {
        beta: config.beta,
        l: config.l,
        t: config.t,
        n_f: config.n_f,
        c_flow: config.c_flow,
        n_meas,
        g2_gf: g2_sum / norm,
        alpha_msbar: alpha_sum / norm,
        mu_lattice,
        a_lambda_msbar: a_lambda,
        channels,
        chiral,
    })
}

fn accumulate(sum: &mut [f64], sample: &[f64]) {
    for (s, v) in sum.iter_mut().zip(sample.iter()) {
        *s += v;
    }
}
