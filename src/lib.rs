/*!
`jv_worker` — the Bellman operator for a Jovanovic on-the-job search model.

What it does
- Builds the model bundle `JvWorker` (parameters, human-capital grid,
  offer distribution `F`, Gauss-Legendre rule) from a `JvConfig`.
- Applies the Bellman operator once: for every grid point `x`, a brute-force
  search over search effort `s` and investment effort `phi` on a 15 × 15 grid,
  using a piecewise-linear interpolant of `V` and quadrature over `F`.
- Returns the updated value function, the greedy policy pair, or both,
  either into caller-provided buffers or freshly allocated.
- Builds the reward matrix and transition tensor of the finite `SimpleOG`
  example, with a one-step discrete Bellman update.
- Simulates human-capital paths under a policy pair with a seeded RNG.

How to use (call surface only)
- `let wp = JvWorker::new(JvConfig::default())?;`
- `let tv = wp.bellman_values(&v)?;` or `wp.bellman_value_into(&v, &mut out)?;`
- `let policy = wp.bellman_policies(&v)?;`
- `let og = SimpleOG::new(SimpleOgConfig::default())?;`

What it does NOT do
- No fixed-point driver. Iterate the operator yourself and pick your own
  stopping rule; one application is a pure value-in, value-out map.
*/

pub mod bellman;
pub mod discrete;
pub mod error;
pub mod model;
pub mod numerics;
pub mod simulate;

pub use bellman::{BellmanOutput, Mode, Objective, Policy, PointOptimum, SEARCH_POINTS};
pub use discrete::{SimpleOG, SimpleOgConfig};
pub use error::{JvError, Result};
pub use model::{JvConfig, JvWorker, OfferDistribution};
pub use numerics::{Extrapolation, LinInterp, do_quad, gauss_legendre};
pub use simulate::simulate_path;
