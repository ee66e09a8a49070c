//! Sample paths of human capital under a fixed policy pair.
//!
//! Each period the worker at `x_t` applies `s_t = s(x_t)`, `phi_t = phi(x_t)`
//! (policies interpolated between grid points, held flat beyond them). An
//! offer arrives with probability `pi(s_t)`; the worker keeps the larger of
//! the offer and the retained capital `G(x_t, phi_t)`.

use tracing::debug;

use crate::bellman::Policy;
use crate::error::{JvError, Result};
use crate::model::{JvWorker, OfferDistribution};
use crate::numerics::stoch;
use crate::numerics::{Extrapolation, LinInterp};

/// `len` states starting from `x0` (included). Deterministic per `seed`.
pub fn simulate_path<F: OfferDistribution>(
    model: &JvWorker<F>,
    policy: &Policy,
    x0: f64,
    len: usize,
    seed: u64,
) -> Result<Vec<f64>> {
    JvError::check_len("search policy", model.grid_size(), policy.s.len())?;
    JvError::check_len("investment policy", model.grid_size(), policy.phi.len())?;
    if !(x0.is_finite() && x0 > 0.0) {
        return Err(JvError::param(
            "x0",
            format!("must be finite and > 0, got {x0}"),
        ));
    }
    if len == 0 {
        return Err(JvError::param("len", "path needs at least one state"));
    }
    check_effort("search policy", &policy.s)?;
    check_effort("investment policy", &policy.phi)?;

    let s_f = LinInterp::new(model.x_grid(), &policy.s)?.with_extrapolation(Extrapolation::Flat);
    let phi_f =
        LinInterp::new(model.x_grid(), &policy.phi)?.with_extrapolation(Extrapolation::Flat);
    let rng = stoch::seeded(seed);

    let mut path = Vec::with_capacity(len);
    let mut x = x0;
    path.push(x);
    let mut offers = 0usize;
    for _ in 1..len {
        let retained = model.checked_g(x, phi_f.eval(x))?;
        x = if stoch::bernoulli(&rng, model.pi(s_f.eval(x))) {
            offers += 1;
            let u = model.dist().quantile(stoch::uniform01(&rng));
            retained.max(u)
        } else {
            retained
        };
        path.push(x);
    }

    debug!(len, seed, offers, x_end = x, "simulated human-capital path");
    Ok(path)
}

/// Effort shares must be finite and lie in [0, 1].
fn check_effort(what: &str, effort: &[f64]) -> Result<()> {
    match effort.iter().position(|e| !(0.0..=1.0).contains(e)) {
        Some(i) => Err(JvError::Domain(format!(
            "{what} at grid index {i} is {}, outside [0, 1]",
            effort[i]
        ))),
        None => Ok(()),
    }
}
