//! # Bellman operator
//!
//! One application maps a value-function guess `V` on `x_grid` to the
//! updated guess `TV` and/or the greedy policy pair `(s, phi)`.
//!
//! For each grid point `x` the operator maximises
//!
//! ```text
//! value(s, phi) = x (1 - s - phi)
//!               + beta [ pi(s) E[V(max(G(x, phi), U))] + (1 - pi(s)) V(G(x, phi)) ]
//! ```
//!
//! over a 15 × 15 grid on `[epsilon, 1]²` restricted to `s + phi <= 1`.
//! `V` between grid points is piecewise-linear; the expectation over
//! `U ~ F` is a Gauss-Legendre sum over the central 99% of `F`.
//!
//! ## Search order and ties
//! `s` is the outer loop, `phi` the inner loop, both ascending. A candidate
//! replaces the incumbent only when strictly better, so among exact ties
//! the pair with the smallest `s` (then smallest `phi`) is reported.
//! Infeasible pairs are skipped outright.
//!
//! ## Buffers
//! The `*_into` methods write into caller-provided slices so repeated
//! applications reuse storage; `bellman_operator` and friends allocate.
//! All length checks run before any grid point is visited.

use tracing::{debug, trace};

use crate::error::{JvError, Result};
use crate::model::{JvWorker, OfferDistribution};
use crate::numerics::{LinInterp, linspace, quadrature::weighted_sum};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Points per axis of the effort search grid.
pub const SEARCH_POINTS: usize = 15;

/// What an operator application should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Value,
    Policies,
    Both,
}

/// Greedy search effort and investment effort over `x_grid`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Policy {
    pub s: Vec<f64>,
    pub phi: Vec<f64>,
}

impl Policy {
    pub fn zeros(n: usize) -> Self {
        Self {
            s: vec![0.0; n],
            phi: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }
}

/// Result of [`JvWorker::bellman_operator`].
#[derive(Clone, Debug, PartialEq)]
pub enum BellmanOutput {
    Value(Vec<f64>),
    Policies(Policy),
    Both { value: Vec<f64>, policy: Policy },
}

impl BellmanOutput {
    pub fn value(&self) -> Option<&[f64]> {
        match self {
            BellmanOutput::Value(v) | BellmanOutput::Both { value: v, .. } => Some(v),
            BellmanOutput::Policies(_) => None,
        }
    }

    pub fn policy(&self) -> Option<&Policy> {
        match self {
            BellmanOutput::Policies(p) | BellmanOutput::Both { policy: p, .. } => Some(p),
            BellmanOutput::Value(_) => None,
        }
    }
}

/// Best feasible pair at one grid point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointOptimum {
    pub value: f64,
    pub s: f64,
    pub phi: f64,
}

/// Continuation terms for a fixed `(x, phi)`; independent of `s`.
#[derive(Clone, Copy, Debug)]
struct Branch {
    phi: f64,
    retained: f64,
    offer: f64,
}

/// Objective at a fixed state `x`, a pure function of `(s, phi)`.
///
/// `x` should be a point of the model's domain (`x >= 0`); the operator only
/// builds these on `x_grid`, which starts at `epsilon`. A negative `x` makes
/// `G` undefined and every value NaN.
pub struct Objective<'m, 'v, F> {
    x: f64,
    model: &'m JvWorker<F>,
    vf: &'m LinInterp<'v>,
}

impl<'m, 'v, F: OfferDistribution> Objective<'m, 'v, F> {
    pub fn new(model: &'m JvWorker<F>, vf: &'m LinInterp<'v>, x: f64) -> Self {
        Self { x, model, vf }
    }

    /// `value(s, phi)` for a single effort pair. Feasibility is not checked.
    pub fn value(&self, s: f64, phi: f64) -> f64 {
        self.value_on(s, &self.branch(phi))
    }

    fn branch(&self, phi: f64) -> Branch {
        let m = self.model;
        let vf = self.vf;
        let g = m.g(self.x, phi);
        let offer = weighted_sum(
            |u| vf.eval(g.max(u)) * m.dist().density(u),
            m.quad_nodes(),
            m.quad_weights(),
        );
        Branch {
            phi,
            retained: vf.eval(g),
            offer,
        }
    }

    #[inline]
    fn value_on(&self, s: f64, b: &Branch) -> f64 {
        let p = self.model.pi(s);
        let expected = p * b.offer + (1.0 - p) * b.retained;
        self.x * (1.0 - b.phi - s) + self.model.beta() * expected
    }

    /// Brute-force maximum over `search × search`, `s` outer, `phi` inner.
    pub fn maximize(&self, search: &[f64]) -> PointOptimum {
        let branches: Vec<Branch> = search.iter().map(|&phi| self.branch(phi)).collect();
        let floor = self.model.epsilon();
        let mut best = PointOptimum {
            value: f64::NEG_INFINITY,
            s: floor,
            phi: floor,
        };
        for &s in search {
            for b in &branches {
                if s + b.phi > 1.0 {
                    continue;
                }
                let v = self.value_on(s, b);
                if v > best.value {
                    best = PointOptimum {
                        value: v,
                        s,
                        phi: b.phi,
                    };
                }
            }
        }
        best
    }
}

/// Operator entry points. `Sync` lets the `parallel` feature share the model.
impl<F: OfferDistribution + Sync> JvWorker<F> {
    /// Search grid for both effort axes.
    pub fn search_grid(&self) -> Vec<f64> {
        linspace(self.epsilon(), 1.0, SEARCH_POINTS)
    }

    /// Optimum at every grid point for the value guess `v`.
    pub fn optima(&self, v: &[f64]) -> Result<Vec<PointOptimum>> {
        JvError::check_len("value function", self.grid_size(), v.len())?;
        let vf = LinInterp::new(self.x_grid(), v)?;
        let search = self.search_grid();
        let solve = |x: f64| {
            let opt = Objective::new(self, &vf, x).maximize(&search);
            trace!(x, value = opt.value, s = opt.s, phi = opt.phi, "grid point optimum");
            opt
        };

        #[cfg(feature = "parallel")]
        let out = self.x_grid().par_iter().map(|&x| solve(x)).collect();
        #[cfg(not(feature = "parallel"))]
        let out = self.x_grid().iter().map(|&x| solve(x)).collect();

        Ok(out)
    }

    /// Writes `TV` into `out`.
    pub fn bellman_value_into(&self, v: &[f64], out: &mut [f64]) -> Result<()> {
        JvError::check_len("value output", self.grid_size(), out.len())?;
        debug!(mode = ?Mode::Value, grid_size = self.grid_size(), "bellman operator");
        for (slot, opt) in out.iter_mut().zip(self.optima(v)?) {
            *slot = opt.value;
        }
        Ok(())
    }

    /// Writes the greedy `(s, phi)` into `s_out` / `phi_out`.
    pub fn bellman_policy_into(
        &self,
        v: &[f64],
        s_out: &mut [f64],
        phi_out: &mut [f64],
    ) -> Result<()> {
        JvError::check_len("search policy output", self.grid_size(), s_out.len())?;
        JvError::check_len("investment policy output", self.grid_size(), phi_out.len())?;
        debug!(mode = ?Mode::Policies, grid_size = self.grid_size(), "bellman operator");
        for ((s, phi), opt) in s_out.iter_mut().zip(phi_out.iter_mut()).zip(self.optima(v)?) {
            *s = opt.s;
            *phi = opt.phi;
        }
        Ok(())
    }

    /// Writes `TV` and the greedy policy in one pass.
    pub fn bellman_into(
        &self,
        v: &[f64],
        out: &mut [f64],
        s_out: &mut [f64],
        phi_out: &mut [f64],
    ) -> Result<()> {
        JvError::check_len("value output", self.grid_size(), out.len())?;
        JvError::check_len("search policy output", self.grid_size(), s_out.len())?;
        JvError::check_len("investment policy output", self.grid_size(), phi_out.len())?;
        debug!(mode = ?Mode::Both, grid_size = self.grid_size(), "bellman operator");
        let slots = out.iter_mut().zip(s_out.iter_mut()).zip(phi_out.iter_mut());
        for (((val, s), phi), opt) in slots.zip(self.optima(v)?) {
            *val = opt.value;
            *s = opt.s;
            *phi = opt.phi;
        }
        Ok(())
    }

    /// Allocating form; `mode` picks what comes back.
    pub fn bellman_operator(&self, v: &[f64], mode: Mode) -> Result<BellmanOutput> {
        let n = self.grid_size();
        match mode {
            Mode::Value => {
                let mut out = vec![0.0; n];
                self.bellman_value_into(v, &mut out)?;
                Ok(BellmanOutput::Value(out))
            }
            Mode::Policies => {
                let mut p = Policy::zeros(n);
                self.bellman_policy_into(v, &mut p.s, &mut p.phi)?;
                Ok(BellmanOutput::Policies(p))
            }
            Mode::Both => {
                let mut value = vec![0.0; n];
                let mut policy = Policy::zeros(n);
                self.bellman_into(v, &mut value, &mut policy.s, &mut policy.phi)?;
                Ok(BellmanOutput::Both { value, policy })
            }
        }
    }

    pub fn bellman_values(&self, v: &[f64]) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.grid_size()];
        self.bellman_value_into(v, &mut out)?;
        Ok(out)
    }

    pub fn bellman_policies(&self, v: &[f64]) -> Result<Policy> {
        let mut p = Policy::zeros(self.grid_size());
        self.bellman_policy_into(v, &mut p.s, &mut p.phi)?;
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JvConfig;

    fn small() -> JvWorker {
        JvWorker::new(JvConfig {
            grid_size: 12,
            ..JvConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn search_grid_spans_epsilon_to_one() {
        let wp = small();
        let g = wp.search_grid();
        assert_eq!(g.len(), SEARCH_POINTS);
        assert_eq!(g[0], wp.epsilon());
        assert_eq!(g[SEARCH_POINTS - 1], 1.0);
    }

    #[test]
    fn zero_value_guess_picks_minimal_effort() {
        // With V = 0 only the wage term matters, maximised at (eps, eps).
        let wp = small();
        let v = vec![0.0; wp.grid_size()];
        let p = wp.bellman_policies(&v).unwrap();
        for i in 0..wp.grid_size() {
            assert_eq!(p.s[i], wp.epsilon());
            assert_eq!(p.phi[i], wp.epsilon());
        }
    }

    #[test]
    fn exact_ties_keep_first_pair_in_search_order() {
        // At x = 0 the wage term vanishes and G(0, phi) = 0 for every phi,
        // so all phi tie for each s.
        let wp = small();
        let search = wp.search_grid();
        let eps = wp.epsilon();

        let v: Vec<f64> = wp.x_grid().iter().map(|x| 1.0 + x).collect();
        let vf = LinInterp::new(wp.x_grid(), &v).unwrap();
        let obj = Objective::new(&wp, &vf, 0.0);
        for &s in &search {
            assert_eq!(obj.value(s, eps), obj.value(s, 0.5));
        }
        assert_eq!(obj.maximize(&search).phi, eps);

        // With V = 0 every feasible pair is worth exactly zero.
        let zeros = vec![0.0; wp.grid_size()];
        let vf = LinInterp::new(wp.x_grid(), &zeros).unwrap();
        let opt = Objective::new(&wp, &vf, 0.0).maximize(&search);
        assert_eq!(opt.value, 0.0);
        assert_eq!((opt.s, opt.phi), (eps, eps));
    }

    #[test]
    fn infeasible_pair_never_wins_even_when_better() {
        // A steep V makes high effort attractive; s + phi must still be <= 1.
        let wp = small();
        let v: Vec<f64> = wp.x_grid().iter().map(|x| 1e6 * x).collect();
        let p = wp.bellman_policies(&v).unwrap();
        for i in 0..wp.grid_size() {
            assert!(p.s[i] + p.phi[i] <= 1.0);
        }
    }

    #[test]
    fn objective_matches_optimum() {
        let wp = small();
        let v: Vec<f64> = wp.x_grid().iter().map(|x| x.sqrt()).collect();
        let vf = LinInterp::new(wp.x_grid(), &v).unwrap();
        let x = wp.x_grid()[5];
        let obj = Objective::new(&wp, &vf, x);
        let opt = obj.maximize(&wp.search_grid());
        assert_eq!(obj.value(opt.s, opt.phi), opt.value);
        for &s in &wp.search_grid() {
            for &phi in &wp.search_grid() {
                if s + phi <= 1.0 {
                    assert!(obj.value(s, phi) <= opt.value);
                }
            }
        }
    }

    #[test]
    fn output_shape_checked_before_work() {
        let wp = small();
        let v = vec![0.0; wp.grid_size()];
        let mut short = vec![0.0; 3];
        assert!(matches!(
            wp.bellman_value_into(&v, &mut short),
            Err(JvError::ShapeMismatch { .. })
        ));
        assert!(wp.bellman_values(&v[..5]).is_err());
    }
}
