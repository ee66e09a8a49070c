//! Simple optimal-growth / inventory example with finite states and actions.
//!
//! State `s ∈ {0, …, B + M}` is the stock on hand; action `a ∈ {0, …, M}` is
//! the amount stored for next period. Consumption is `s - a` with utility
//! `(s - a)^alpha`, infeasible when `a > s`. Next period's stock is `a + U`
//! with `U` uniform on `{0, …, B}`.
//!
//! `R` is stored row-major as `n × m`, `Q` as `n × m × n`.

use tracing::debug;

use crate::error::{JvError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleOgConfig {
    /// Upper bound of the random endowment.
    pub b: usize,
    /// Storage capacity.
    pub m: usize,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for SimpleOgConfig {
    fn default() -> Self {
        Self {
            b: 10,
            m: 5,
            alpha: 0.5,
            beta: 0.9,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimpleOG {
    b: usize,
    m: usize,
    alpha: f64,
    beta: f64,
    n: usize,
    r: Vec<f64>,
    q: Vec<f64>,
}

impl SimpleOG {
    pub fn new(config: SimpleOgConfig) -> Result<Self> {
        let SimpleOgConfig { b, m, alpha, beta } = config;
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(JvError::param(
                "alpha",
                format!("must be finite and > 0, got {alpha}"),
            ));
        }
        if !(beta > 0.0 && beta < 1.0) {
            return Err(JvError::param(
                "beta",
                format!("must lie in (0, 1), got {beta}"),
            ));
        }

        let n = b + m + 1;
        let actions = m + 1;

        let mut r = vec![f64::NEG_INFINITY; n * actions];
        for s in 0..n {
            for a in 0..=m.min(s) {
                r[s * actions + a] = ((s - a) as f64).powf(alpha);
            }
        }

        // Row Q[s, a, :] depends on `a` only.
        let mass = 1.0 / (b + 1) as f64;
        let mut q = vec![0.0; n * actions * n];
        for s in 0..n {
            for a in 0..actions {
                let row = (s * actions + a) * n;
                q[row + a..=row + a + b].fill(mass);
            }
        }

        debug!(b, m, alpha, beta, states = n, actions, "built SimpleOG");
        Ok(Self {
            b,
            m,
            alpha,
            beta,
            n,
            r,
            q,
        })
    }

    pub fn b(&self) -> usize {
        self.b
    }
    pub fn m(&self) -> usize {
        self.m
    }
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
    pub fn beta(&self) -> f64 {
        self.beta
    }
    pub fn num_states(&self) -> usize {
        self.n
    }
    pub fn num_actions(&self) -> usize {
        self.m + 1
    }

    /// Reward `R[s, a]`; `-inf` when `a > s`.
    #[inline]
    pub fn r(&self, s: usize, a: usize) -> f64 {
        self.r[s * self.num_actions() + a]
    }

    /// Next-state distribution `Q[s, a, :]`.
    #[inline]
    pub fn q_row(&self, s: usize, a: usize) -> &[f64] {
        let start = (s * self.num_actions() + a) * self.n;
        &self.q[start..start + self.n]
    }

    /// `R`, row-major `n × m`.
    pub fn r_matrix(&self) -> &[f64] {
        &self.r
    }

    /// `Q`, row-major `n × m × n`.
    pub fn q_tensor(&self) -> &[f64] {
        &self.q
    }

    /// One Bellman step: `Tv[s] = max_a R[s, a] + beta Σ Q[s, a, s'] v[s']`,
    /// with the greedy action per state. Ties keep the smallest action.
    pub fn bellman(&self, v: &[f64]) -> Result<(Vec<f64>, Vec<usize>)> {
        JvError::check_len("value function", self.n, v.len())?;
        let mut tv = vec![f64::NEG_INFINITY; self.n];
        let mut sigma = vec![0usize; self.n];
        for s in 0..self.n {
            for a in 0..self.num_actions() {
                let reward = self.r(s, a);
                if reward == f64::NEG_INFINITY {
                    continue;
                }
                let ev: f64 = self.q_row(s, a).iter().zip(v).map(|(p, x)| p * x).sum();
                let val = reward + self.beta * ev;
                if val > tv[s] {
                    tv[s] = val;
                    sigma[s] = a;
                }
            }
        }
        Ok((tv, sigma))
    }
}
