// SPDX-License-Identifier: AGPL-3.0-only

//! Wilson gauge field on a periodic T×L³ lattice.
//!
//! The fundamental observable is the plaquette, the smallest closed loop
//! of link variables:
//!
//!   `P_μν`(x) = `U_μ`(x) `U_ν`(x+μ) `U_μ`†(x+ν) `U_ν`†(x)
//!
//! and the Wilson action is S = β Σ\_{x,μ<ν} (1 − Re Tr `P_μν`(x)/3).
//!
//! Coordinates are `[t, x, y, z]` with direction 0 the Euclidean time axis
//! (extent T) and directions 1..3 the spatial axes (extent L). All neighbor
//! access goes through [`Lattice::neighbor`]; no other code performs
//! coordinate arithmetic.
//!
//! # References
//!
//! - Wilson, PRD 10, 2445 (1974)
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 3

use super::su3::Su3Matrix;

/// Periodic 4D lattice of SU(3) link variables.
///
/// Links are stored as `links[site * 4 + mu]` with mu ∈ {0,1,2,3}.
#[derive(Clone)]
pub struct Lattice {
    /// Axis extents `[T, L, L, L]`.
    pub dims: [usize; 4],
    /// Link variables: `links[site * 4 + mu]`.
    pub links: Vec<Su3Matrix>,
    /// Inverse bare coupling β = 6/g².
    pub beta: f64,
}

impl Lattice {
    /// Cold start: every link the identity (ordered configuration).
    #[must_use]
    pub fn cold_start(l: usize, t: usize, beta: f64) -> Self {
        let dims = [t, l, l, l];
        let vol = dims[0] * dims[1] * dims[2] * dims[3];
        Self {
            dims,
            links: vec![Su3Matrix::IDENTITY; vol * 4],
            beta,
        }
    }

    /// Total number of lattice sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2] * self.dims[3]
    }

    /// Number of sites on one timeslice.
    #[must_use]
    pub const fn spatial_volume(&self) -> usize {
        self.dims[1] * self.dims[2] * self.dims[3]
    }

    /// Temporal extent T.
    #[must_use]
    pub const fn time_extent(&self) -> usize {
        self.dims[0]
    }

    /// Convert `[t, x, y, z]` to the linear site index (t slowest).
    #[must_use]
    pub const fn site_index(&self, x: [usize; 4]) -> usize {
        ((x[0] * self.dims[1] + x[1]) * self.dims[2] + x[2]) * self.dims[3] + x[3]
    }

    /// Convert a linear site index back to `[t, x, y, z]`.
    #[must_use]
    pub const fn site_coords(&self, idx: usize) -> [usize; 4] {
        let z = idx % self.dims[3];
        let rem = idx / self.dims[3];
        let y = rem % self.dims[2];
        let rem = rem / self.dims[2];
        let x = rem % self.dims[1];
        let t = rem / self.dims[1];
        [t, x, y, z]
    }

    /// Neighbor of `x` one step along `mu`, with periodic wrap.
    #[must_use]
    pub const fn neighbor(&self, x: [usize; 4], mu: usize, forward: bool) -> [usize; 4] {
        let mut y = x;
        if forward {
            y[mu] = (x[mu] + 1) % self.dims[mu];
        } else {
            y[mu] = (x[mu] + self.dims[mu] - 1) % self.dims[mu];
        }
        y
    }

    /// Get link `U_mu`(x).
    pub fn link(&self, x: [usize; 4], mu: usize) -> Su3Matrix {
        self.links[self.site_index(x) * 4 + mu]
    }

    /// Set link `U_mu`(x).
    pub fn set_link(&mut self, x: [usize; 4], mu: usize, u: Su3Matrix) {
        let idx = self.site_index(x);
        self.links[idx * 4 + mu] = u;
    }

    /// Plaquette `P_μν`(x) = `U_μ`(x) `U_ν`(x+μ) `U_μ`†(x+ν) `U_ν`†(x).
    pub fn plaquette(&self, x: [usize; 4], mu: usize, nu: usize) -> Su3Matrix {
        let x_mu = self.neighbor(x, mu, true);
        let x_nu = self.neighbor(x, nu, true);

        let u1 = self.link(x, mu);
        let u2 = self.link(x_mu, nu);
        let u3 = self.link(x_nu, mu).adjoint();
        let u4 = self.link(x, nu).adjoint();

        u1 * u2 * u3 * u4
    }

    /// Average plaquette ⟨Re Tr P / 3⟩ over all 6·V distinct plaquettes.
    ///
    /// Exactly 1.0 on a cold configuration; the scalar order parameter for
    /// the whole pipeline.
    #[must_use]
    pub fn average_plaquette(&self) -> f64 {
        let vol = self.volume();
        let mut sum = 0.0;
        let mut count = 0usize;

        for idx in 0..vol {
            let x = self.site_coords(idx);
            for mu in 0..4 {
                for nu in (mu + 1)..4 {
                    sum += self.plaquette(x, mu, nu).re_trace() / 3.0;
                    count += 1;
                }
            }
        }

        sum / count as f64
    }

    /// Staple sum for link `U_μ`(x): the six three-link paths that close a
    /// plaquette with it. The local derivative of the action with respect
    /// to this link.
    ///
    /// For each ν ≠ μ:
    ///   forward: `U_ν`(x+μ) `U_μ`†(x+ν) `U_ν`†(x)
    ///   backward: `U_ν`†(x+μ−ν) `U_μ`†(x−ν) `U_ν`(x−ν)
    pub fn staple(&self, x: [usize; 4], mu: usize) -> Su3Matrix {
        let mut s = Su3Matrix::ZERO;
        let x_mu = self.neighbor(x, mu, true);

        for nu in 0..4 {
            if nu == mu {
                continue;
            }
            let x_nu = self.neighbor(x, nu, true);
            let x_mu_bnu = self.neighbor(x_mu, nu, false);
            let x_bnu = self.neighbor(x, nu, false);

            let forward =
                self.link(x_mu, nu) * self.link(x_nu, mu).adjoint() * self.link(x, nu).adjoint();

            let backward = self.link(x_mu_bnu, nu).adjoint()
                * self.link(x_bnu, mu).adjoint()
                * self.link(x_bnu, nu);

            s = s + forward + backward;
        }

        s
    }

    /// Wilson gauge action S = β Σ\_{x,μ<ν} (1 − Re Tr P / 3).
    #[must_use]
    pub fn wilson_action(&self) -> f64 {
        let vol = self.volume();
        let mut sum = 0.0;

        for idx in 0..vol {
            let x = self.site_coords(idx);
            for mu in 0..4 {
                for nu in (mu + 1)..4 {
                    sum += 1.0 - self.plaquette(x, mu, nu).re_trace() / 3.0;
                }
            }
        }

        self.beta * sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{COLD_ACTION_ABS, COLD_PLAQUETTE_ABS};

    #[test]
    fn cold_start_plaquette_is_one() {
        let lat = Lattice::cold_start(4, 4, 6.0);
        let p = lat.average_plaquette();
        assert!(
            (p - 1.0).abs() < COLD_PLAQUETTE_ABS,
            "cold start plaquette should be 1.0, got {p}"
        );
    }

    #[test]
    fn cold_start_plaquettes_are_identity() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        let p = lat.plaquette([1, 0, 1, 0], 0, 2);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((p.m[i][j].re - expected).abs() < 1e-14);
                assert!(p.m[i][j].im.abs() < 1e-14);
            }
        }
    }

    #[test]
    fn cold_start_action_is_zero() {
        let lat = Lattice::cold_start(4, 4, 6.0);
        let s = lat.wilson_action();
        assert!(s.abs() < COLD_ACTION_ABS, "cold action should be 0, got {s}");
    }

    #[test]
    fn site_index_roundtrip() {
        let lat = Lattice::cold_start(3, 5, 6.0);
        for idx in 0..lat.volume() {
            let coords = lat.site_coords(idx);
            assert_eq!(idx, lat.site_index(coords), "roundtrip failed at {idx}");
        }
    }

    #[test]
    fn shift_by_extent_is_identity() {
        // Walking any axis its full extent, either way, returns home.
        let lat = Lattice::cold_start(4, 6, 6.0);
        let start = [5, 1, 3, 2];
        for mu in 0..4 {
            for forward in [true, false] {
                let mut x = start;
                for _ in 0..lat.dims[mu] {
                    x = lat.neighbor(x, mu, forward);
                }
                assert_eq!(x, start, "axis {mu} forward={forward}");
            }
        }
    }

    #[test]
    fn neighbor_wraps_at_boundary() {
        let lat = Lattice::cold_start(4, 4, 6.0);
        let fwd = lat.neighbor([0, 3, 0, 0], 1, true);
        assert_eq!(fwd, [0, 0, 0, 0]);
        let bwd = lat.neighbor([0, 0, 0, 0], 1, false);
        assert_eq!(bwd, [0, 3, 0, 0]);
        let tfwd = lat.neighbor([3, 0, 0, 0], 0, true);
        assert_eq!(tfwd, [0, 0, 0, 0]);
    }

    #[test]
    fn staple_on_cold_lattice_sums_identities() {
        // Six closed paths of identity links: staple = 6·I.
        let lat = Lattice::cold_start(4, 4, 6.0);
        let s = lat.staple([1, 1, 1, 1], 2);
        for i in 0..3 {
            let expected = 6.0;
            assert!((s.m[i][i].re - expected).abs() < 1e-13);
        }
    }

    #[test]
    fn plaquette_is_unitary_after_perturbation() {
        let mut lat = Lattice::cold_start(4, 4, 6.0);
        let mut seed = 99u64;
        for link in &mut lat.links {
            *link = (*link * Su3Matrix::random_near_identity(&mut seed, 0.2)).reunitarize();
        }
        let p = lat.plaquette([0, 0, 0, 0], 0, 1);
        assert!(p.unitarity_error() < 1e-8, "plaquette should stay unitary");
    }

    #[test]
    fn anisotropic_extents_addressed_correctly() {
        let lat = Lattice::cold_start(2, 4, 5.7);
        assert_eq!(lat.volume(), 4 * 2 * 2 * 2);
        assert_eq!(lat.spatial_volume(), 8);
        assert_eq!(lat.time_extent(), 4);
        let idx = lat.site_index([3, 1, 0, 1]);
        assert_eq!(lat.site_coords(idx), [3, 1, 0, 1]);
    }
}
