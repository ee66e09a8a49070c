/// Quadrature: Gauss-Legendre rule on [a, b] and the weighted-sum evaluator.
use crate::error::{JvError, Result};

const NEWTON_TOL: f64 = 1e-14;
const NEWTON_MAX_ITERS: usize = 100;

/// Gauss-Legendre nodes and weights for `n` points on `[a, b]`.
///
/// Nodes come back ascending and strictly inside `(a, b)`; weights are
/// positive and sum to `b - a`. The rule integrates polynomials of degree
/// up to `2n - 1` exactly.
pub fn gauss_legendre(n: usize, a: f64, b: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    if n == 0 {
        return Err(JvError::param("n", "node count must be at least 1"));
    }
    if !a.is_finite() || !b.is_finite() {
        return Err(JvError::param(
            "bounds",
            format!("[{a}, {b}] is not finite"),
        ));
    }
    if a >= b {
        return Err(JvError::param(
            "bounds",
            format!("need a < b, got [{a}, {b}]"),
        ));
    }

    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    let mid = 0.5 * (b + a);
    let half = 0.5 * (b - a);
    let nf = n as f64;

    // Roots are symmetric; solve for the upper half only.
    for i in 0..n.div_ceil(2) {
        let mut z = (std::f64::consts::PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
        let mut dp = 1.0;
        for _ in 0..NEWTON_MAX_ITERS {
            let (p, d) = legendre_with_derivative(n, z);
            dp = d;
            let z_prev = z;
            z = z_prev - p / d;
            if (z - z_prev).abs() < NEWTON_TOL {
                break;
            }
        }
        nodes[i] = mid - half * z;
        nodes[n - 1 - i] = mid + half * z;
        let w = 2.0 * half / ((1.0 - z * z) * dp * dp);
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    Ok((nodes, weights))
}

/// P_n(z) and P_n'(z) via the three-term recurrence.
#[inline]
fn legendre_with_derivative(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        let jf = j as f64;
        p1 = ((2.0 * jf + 1.0) * z * p2 - jf * p3) / (jf + 1.0);
    }
    let dp = n as f64 * (z * p1 - p2) / (z * z - 1.0);
    (p1, dp)
}

/// Weighted sum Σ w_k f(x_k).
pub fn do_quad<Fun>(f: Fun, nodes: &[f64], weights: &[f64]) -> Result<f64>
where
    Fun: Fn(f64) -> f64,
{
    JvError::check_len("quadrature weights", nodes.len(), weights.len())?;
    Ok(weighted_sum(f, nodes, weights))
}

/// Unchecked form of [`do_quad`] for callers that validated lengths up front.
#[inline]
pub(crate) fn weighted_sum<Fun>(f: Fun, nodes: &[f64], weights: &[f64]) -> f64
where
    Fun: Fn(f64) -> f64,
{
    nodes.iter().zip(weights).map(|(&x, &w)| w * f(x)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_node_is_midpoint_rule() {
        let (x, w) = gauss_legendre(1, 0.0, 2.0).unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[0], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn two_point_nodes_match_closed_form() {
        let (x, w) = gauss_legendre(2, -1.0, 1.0).unwrap();
        let r = 1.0 / 3.0_f64.sqrt();
        assert_abs_diff_eq!(x[0], -r, epsilon = 1e-14);
        assert_abs_diff_eq!(x[1], r, epsilon = 1e-14);
        assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(w[1], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(gauss_legendre(0, 0.0, 1.0).is_err());
        assert!(gauss_legendre(5, 1.0, 1.0).is_err());
        assert!(gauss_legendre(5, 2.0, 1.0).is_err());
        assert!(gauss_legendre(5, 0.0, f64::INFINITY).is_err());
        assert!(do_quad(|x| x, &[0.0, 1.0], &[1.0]).is_err());
    }
}
