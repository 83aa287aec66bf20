// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized numeric tolerances and iteration caps.
//!
//! Every threshold used by tests and validation binaries is a named constant
//! with its provenance, never an inline magic number at the check site.

// ═══════════════════════════════════════════════════════════════════
// SU(3) link constraints
// ═══════════════════════════════════════════════════════════════════

/// Unitarity after projection: ‖U†U − I‖_∞ bound.
///
/// Gram-Schmidt reunitarization restores the constraint to machine
/// precision; 1e-10 leaves headroom for accumulated rounding in products.
pub const SU3_UNITARITY_ABS: f64 = 1e-10;

/// Determinant after projection: |det U − 1| bound.
pub const SU3_DET_ABS: f64 = 1e-10;

/// Cold plaquette: absolute error (exactly 1.0 for identity links).
pub const COLD_PLAQUETTE_ABS: f64 = 1e-12;

/// Cold Wilson action: absolute error (exactly 0.0 for identity links).
pub const COLD_ACTION_ABS: f64 = 1e-10;

/// Division guard for norms and Gram-Schmidt pivots.
///
/// Well below any physical lattice scale; prevents 0/0 in degenerate
/// intermediate states.
pub const DIVISION_GUARD: f64 = 1e-30;

// ═══════════════════════════════════════════════════════════════════
// Gamma algebra
// ═══════════════════════════════════════════════════════════════════

/// Clifford algebra identities: {γ_μ, γ_ν} = 2δ_μν, γ₅² = 1.
///
/// The matrices are built from exact 0/±1/±i entries; products are exact
/// up to a handful of ULP.
pub const GAMMA_ALGEBRA_ABS: f64 = 1e-14;

// ═══════════════════════════════════════════════════════════════════
// Conjugate gradient (Wilson normal equations)
// ═══════════════════════════════════════════════════════════════════

/// Default absolute residual tolerance: stop when ‖r‖² < tol².
pub const CG_TOLERANCE: f64 = 1e-10;

/// Default iteration cap for propagator solves.
///
/// Exhausting the cap is tolerated: the best iterate is returned and the
/// achieved residual is reported through `CgStats`.
pub const CG_MAX_ITER: usize = 600;

// ═══════════════════════════════════════════════════════════════════
// RG scale setting
// ═══════════════════════════════════════════════════════════════════

/// Λ↔α round trip: relative error over loops 1..=4 and n_f ∈ {0,3,4,5}.
///
/// Limited by the 80-iteration bisection bracket width, not by the
/// Simpson quadrature (20k panels is far tighter).
pub const RG_ROUNDTRIP_REL: f64 = 1e-6;

/// Matching inversion: |g²(α) − g²_input| relative after Newton.
pub const MATCHING_RESIDUAL_REL: f64 = 1e-10;

// ═══════════════════════════════════════════════════════════════════
// Ensemble reduction
// ═══════════════════════════════════════════════════════════════════

/// Chiral extrapolation denominator guard: |x₂ − x₁| below this is
/// degenerate and fatal (the two κ values resolve the same pion mass).
pub const CHIRAL_DENOMINATOR_GUARD: f64 = 1e-12;

/// Metropolis acceptance sanity floor for a functioning sampler at
/// moderate coupling with the default proposal spread.
pub const METROPOLIS_ACCEPTANCE_MIN: f64 = 0.05;
