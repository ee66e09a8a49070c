//! # Model parameters
//!
//! `JvWorker` bundles everything the Bellman operator reads: the economic
//! parameters, the human-capital grid, the offer distribution `F` and the
//! Gauss-Legendre rule used to integrate against it.
//!
//! Build one from a [`JvConfig`] (every field has a default).
//! Every parameter is validated before the grid or quadrature rule is
//! touched; nothing is ever clamped into range.
//!
//! ```no_run
//! use jv_worker::{JvConfig, JvWorker};
//!
//! let wp = JvWorker::new(JvConfig { grid_size: 30, ..JvConfig::default() })?;
//! assert_eq!(wp.x_grid().len(), 30);
//! # Ok::<(), jv_worker::JvError>(())
//! ```

use std::fmt;

use statrs::distribution::{Beta, Continuous, ContinuousCDF};
use tracing::debug;

use crate::error::{JvError, Result};
use crate::numerics::{gauss_legendre, linspace};

/// Number of Gauss-Legendre nodes for the offer integral.
pub const QUAD_NODES: usize = 21;
/// Lower / upper tail probabilities bounding the quadrature interval.
pub const QUAD_TAIL_LO: f64 = 0.005;
pub const QUAD_TAIL_HI: f64 = 0.995;

/// Offer draw distribution: density and quantile function.
pub trait OfferDistribution {
    fn density(&self, x: f64) -> f64;
    fn quantile(&self, p: f64) -> f64;
}

impl<D> OfferDistribution for D
where
    D: Continuous<f64, f64> + ContinuousCDF<f64, f64>,
{
    #[inline]
    fn density(&self, x: f64) -> f64 {
        self.pdf(x)
    }
    #[inline]
    fn quantile(&self, p: f64) -> f64 {
        self.inverse_cdf(p)
    }
}

/// Default offer distribution, Beta(2, 2).
pub fn default_offer_dist() -> Result<Beta> {
    Beta::new(2.0, 2.0).map_err(|e| JvError::Distribution(e.to_string()))
}

/// Default offer probability, `pi(s) = sqrt(s)`.
#[inline]
pub fn default_pi(s: f64) -> f64 {
    s.sqrt()
}

/// Scalar parameters. Defaults are the standard calibration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JvConfig {
    /// Productivity scale in `G(x, phi) = A (x phi)^alpha`.
    pub a: f64,
    /// Curvature of `G`, in (0, 1).
    pub alpha: f64,
    /// Discount factor, in (0, 1).
    pub beta: f64,
    /// Number of human-capital grid points (at least 2).
    pub grid_size: usize,
    /// Grid floor and lower bound of the effort search.
    pub epsilon: f64,
}

impl Default for JvConfig {
    fn default() -> Self {
        Self {
            a: 1.4,
            alpha: 0.6,
            beta: 0.96,
            grid_size: 50,
            epsilon: 1e-4,
        }
    }
}

impl JvConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.a.is_finite() && self.a > 0.0) {
            return Err(JvError::param(
                "A",
                format!("must be finite and > 0, got {}", self.a),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(JvError::param(
                "alpha",
                format!("must lie in (0, 1), got {}", self.alpha),
            ));
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(JvError::param(
                "beta",
                format!("must lie in (0, 1), got {}", self.beta),
            ));
        }
        if self.grid_size < 2 {
            return Err(JvError::param(
                "grid_size",
                format!("need at least 2 points, got {}", self.grid_size),
            ));
        }
        // Below 0.5 so that (epsilon, epsilon) is a feasible effort pair.
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(JvError::param(
                "epsilon",
                format!("must lie in (0, 0.5), got {}", self.epsilon),
            ));
        }
        Ok(())
    }
}

/// Immutable model bundle consumed by the Bellman operator.
#[derive(Clone, Debug)]
pub struct JvWorker<F = Beta> {
    a: f64,
    alpha: f64,
    beta: f64,
    epsilon: f64,
    x_grid: Vec<f64>,
    pi_func: fn(f64) -> f64,
    dist: F,
    quad_nodes: Vec<f64>,
    quad_weights: Vec<f64>,
}

impl JvWorker<Beta> {
    /// Model with the default offer distribution and `pi = sqrt`.
    pub fn new(config: JvConfig) -> Result<Self> {
        Self::with_parts(config, default_pi, default_offer_dist()?)
    }
}

impl<F: OfferDistribution> JvWorker<F> {
    /// Model with a caller-supplied offer probability and offer distribution.
    pub fn with_parts(config: JvConfig, pi_func: fn(f64) -> f64, dist: F) -> Result<Self> {
        config.validate()?;
        let JvConfig {
            a,
            alpha,
            beta,
            grid_size,
            epsilon,
        } = config;

        // Grid covers the retained-capital fixed point and almost all of F.
        let fixed_point = a.powf(1.0 / (1.0 - alpha));
        let f_top = dist.quantile(1.0 - epsilon);
        if !f_top.is_finite() {
            return Err(JvError::Domain(format!("F quantile at 1 - epsilon is {f_top}")));
        }
        let grid_max = fixed_point.max(f_top);
        if grid_max <= epsilon {
            return Err(JvError::Domain(format!(
                "grid upper bound {grid_max} does not exceed epsilon {epsilon}"
            )));
        }
        let x_grid = linspace(epsilon, grid_max, grid_size);

        let lo = dist.quantile(QUAD_TAIL_LO);
        let hi = dist.quantile(QUAD_TAIL_HI);
        let (quad_nodes, quad_weights) = gauss_legendre(QUAD_NODES, lo, hi)?;

        debug!(
            a,
            alpha,
            beta,
            grid_size,
            epsilon,
            grid_max,
            quad_lo = lo,
            quad_hi = hi,
            "built JvWorker"
        );

        Ok(Self {
            a,
            alpha,
            beta,
            epsilon,
            x_grid,
            pi_func,
            dist,
            quad_nodes,
            quad_weights,
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
    pub fn beta(&self) -> f64 {
        self.beta
    }
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
    pub fn x_grid(&self) -> &[f64] {
        &self.x_grid
    }
    pub fn grid_size(&self) -> usize {
        self.x_grid.len()
    }
    pub fn quad_nodes(&self) -> &[f64] {
        &self.quad_nodes
    }
    pub fn quad_weights(&self) -> &[f64] {
        &self.quad_weights
    }
    pub fn dist(&self) -> &F {
        &self.dist
    }

    /// Offer probability at search effort `s`.
    #[inline]
    pub fn pi(&self, s: f64) -> f64 {
        (self.pi_func)(s)
    }

    /// Retained next-period capital, `A (x phi)^alpha`.
    #[inline]
    pub fn g(&self, x: f64, phi: f64) -> f64 {
        self.a * (x * phi).powf(self.alpha)
    }

    /// [`g`](Self::g) with a domain check on `x * phi`.
    pub fn checked_g(&self, x: f64, phi: f64) -> Result<f64> {
        let base = x * phi;
        if !(base.is_finite() && base > 0.0) {
            return Err(JvError::Domain(format!(
                "G needs x * phi > 0, got x = {x}, phi = {phi}"
            )));
        }
        Ok(self.g(x, phi))
    }
}

impl<F> fmt::Display for JvWorker<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Jovanovic worker (on-the-job search):")?;
        writeln!(f, "  - A (productivity scale)       : {}", self.a)?;
        writeln!(f, "  - alpha (capital curvature)    : {}", self.alpha)?;
        writeln!(f, "  - beta (discount factor)       : {}", self.beta)?;
        writeln!(f, "  - grid size                    : {}", self.x_grid.len())?;
        writeln!(f, "  - epsilon                      : {}", self.epsilon)?;
        write!(
            f,
            "  - grid range                   : [{}, {}]",
            self.x_grid[0],
            self.x_grid[self.x_grid.len() - 1]
        )
    }
}
