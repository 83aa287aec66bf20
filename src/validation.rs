// SPDX-License-Identifier: AGPL-3.0-only

//! Pass/fail harness for the validation binaries.
//!
//! Each binary accumulates named checks against documented tolerances and
//! exits 0 only when every check passes, with a machine-greppable summary
//! on stdout.

use std::process;

/// One recorded check.
#[derive(Debug, Clone)]
pub struct Check {
    /// Human-readable label.
    pub label: String,
    /// Whether the check passed.
    pub passed: bool,
    /// Observed value.
    pub observed: f64,
    /// Expected value or threshold.
    pub expected: f64,
    /// Tolerance applied.
    pub tolerance: f64,
}

/// Accumulates checks and produces a summary with an exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    /// Name of the validation binary.
    pub name: String,
    /// All checks performed so far.
    pub checks: Vec<Check>,
}

impl ValidationHarness {
    /// Create a harness for a named validation binary.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
        }
    }

    /// Absolute check: |observed − expected| < tolerance.
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        self.push(label, (observed - expected).abs() < tolerance, observed, expected, tolerance);
    }

    /// Relative check: |observed − expected| / |expected| < tolerance
    /// (absolute when expected is ~0).
    pub fn check_rel(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = if expected.abs() > f64::EPSILON {
            ((observed - expected) / expected).abs() < tolerance
        } else {
            observed.abs() < tolerance
        };
        self.push(label, passed, observed, expected, tolerance);
    }

    /// Upper bound: observed < threshold.
    pub fn check_upper(&mut self, label: &str, observed: f64, threshold: f64) {
        self.push(label, observed < threshold, observed, threshold, threshold);
    }

    /// Lower bound: observed > threshold.
    pub fn check_lower(&mut self, label: &str, observed: f64, threshold: f64) {
        self.push(label, observed > threshold, observed, threshold, threshold);
    }

    /// Boolean check.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        self.push(label, passed, f64::from(u8::from(passed)), 1.0, 0.0);
    }

    /// Finiteness check: observed is neither NaN nor infinite.
    pub fn check_finite(&mut self, label: &str, observed: f64) {
        self.push(label, observed.is_finite(), observed, f64::NAN, 0.0);
    }

    fn push(&mut self, label: &str, passed: bool, observed: f64, expected: f64, tolerance: f64) {
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
        });
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Total number of checks.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// Whether every check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Print the summary and exit 0 (all passed) or 1 (any failed).
    pub fn finish(&self) -> ! {
        println!();
        println!(
            "=== {} validation: {}/{} checks passed ===",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        for check in &self.checks {
            let icon = if check.passed { "PASS" } else { "FAIL" };
            println!(
                "  [{icon}] {}: observed={:.6e}, expected={:.6e}, tol={:.2e}",
                check.label, check.observed, check.expected, check.tolerance
            );
        }
        if self.all_passed() {
            println!("ALL CHECKS PASSED");
            process::exit(0);
        }
        let failed: Vec<&str> = self
            .checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.label.as_str())
            .collect();
        println!("FAILED CHECKS: {}", failed.join(", "));
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_pass_and_fail() {
        let mut h = ValidationHarness::new("test");
        h.check_abs("exact", 1.0, 1.0, 1e-10);
        h.check_abs("far", 2.0, 1.0, 1e-3);
        assert_eq!(h.passed_count(), 1);
        assert_eq!(h.total_count(), 2);
        assert!(!h.all_passed());
    }

    #[test]
    fn relative_check_handles_zero_expected() {
        let mut h = ValidationHarness::new("test");
        h.check_rel("near_zero", 1e-15, 0.0, 1e-10);
        assert!(h.checks[0].passed);
        h.check_rel("large_off", 1.0, 0.0, 1e-10);
        assert!(!h.checks[1].passed);
    }

    #[test]
    fn bounds_are_strict() {
        let mut h = ValidationHarness::new("test");
        h.check_upper("at_threshold", 1.0, 1.0);
        h.check_lower("at_threshold", 1.0, 1.0);
        assert!(!h.checks[0].passed);
        assert!(!h.checks[1].passed);
    }

    #[test]
    fn finite_check_rejects_nan_and_inf() {
        let mut h = ValidationHarness::new("test");
        h.check_finite("nan", f64::NAN);
        h.check_finite("inf", f64::INFINITY);
        h.check_finite("ok", 0.5);
        assert!(!h.checks[0].passed);
        assert!(!h.checks[1].passed);
        assert!(h.checks[2].passed);
    }

    #[test]
    fn empty_harness_vacuously_passes() {
        let h = ValidationHarness::new("empty");
        assert!(h.all_passed());
        assert_eq!(h.total_count(), 0);
    }
}
