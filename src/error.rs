// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for scale setting and ensemble runs.
//!
//! A proper enum instead of `Result<_, String>` so callers can pattern-match
//! on the failure kind: invalid input domain, a search that found no bracket,
//! or an ensemble whose statistics are undefined. Tolerated numerical
//! degeneracies (unconverged CG, undefined effective masses) are *not*
//! errors; they surface as NaN in the result record.

use std::fmt;

/// Errors from the scale-setting library and the ensemble driver.
#[derive(Debug, Clone, PartialEq)]
pub enum LatScaleError {
    /// An input outside its mathematical domain (non-positive μ, α, Λ, g², ...).
    InvalidDomain {
        /// Which quantity was out of domain.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Perturbative loop order outside the supported range 1..=4.
    LoopOrderOutOfRange(u32),

    /// A root search could not bracket its target (RG coupling bisection).
    BracketingFailure(String),

    /// Chiral extrapolation with coincident pion mass-squared points.
    DegenerateChiralPoint {
        /// am_π² at the first hopping parameter.
        x1: f64,
        /// am_π² at the second hopping parameter.
        x2: f64,
    },

    /// An ensemble run finished without taking a single measurement.
    NoMeasurements {
        /// Total sweeps performed.
        sweeps: usize,
        /// Measurement stride that was configured.
        every: usize,
    },

    /// A named configuration profile that does not exist.
    UnknownProfile(String),
}

impl fmt::Display for LatScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { what, value } => {
                write!(f, "invalid domain: {what} = {value} must be positive")
            }
            Self::LoopOrderOutOfRange(loops) => {
                write!(f, "loop order {loops} outside supported range 1..=4")
            }
            Self::BracketingFailure(msg) => write!(f, "bracketing failure: {msg}"),
            Self::DegenerateChiralPoint { x1, x2 } => {
                write!(
                    f,
                    "chiral extrapolation degenerate: am_pi^2 points coincide ({x1} vs {x2})"
                )
            }
            Self::NoMeasurements { sweeps, every } => {
                write!(
                    f,
                    "no measurements taken ({sweeps} sweeps, stride {every}); \
                     increase sweeps or reduce the stride"
                )
            }
            Self::UnknownProfile(name) => write!(f, "unknown profile: {name}"),
        }
    }
}

impl std::error::Error for LatScaleError {}
