// tests/numerics.rs
use approx::assert_abs_diff_eq;
use jv_worker::{Extrapolation, LinInterp, do_quad, gauss_legendre};

/* ──────────────────────────────────────────────────────────────────────────
1) Quadrature — closed-form integrals on [0, 1]
────────────────────────────────────────────────────────────────────────── */

#[test]
fn polynomials_on_unit_interval() {
    let (x, w) = gauss_legendre(21, 0.0, 1.0).unwrap();
    assert_abs_diff_eq!(do_quad(|_| 1.0, &x, &w).unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(do_quad(|t| t, &x, &w).unwrap(), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(do_quad(|t| t * t, &x, &w).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn exact_up_to_degree_2n_minus_1() {
    // 3 nodes integrate x^5 exactly on [-1, 2]: (64 - 1) / 6.
    let (x, w) = gauss_legendre(3, -1.0, 2.0).unwrap();
    assert_abs_diff_eq!(do_quad(|t| t.powi(5), &x, &w).unwrap(), 63.0 / 6.0, epsilon = 1e-11);
}

#[test]
fn smooth_function_converges() {
    let (x, w) = gauss_legendre(21, 0.0, std::f64::consts::PI).unwrap();
    assert_abs_diff_eq!(do_quad(f64::sin, &x, &w).unwrap(), 2.0, epsilon = 1e-12);
}

#[test]
fn nodes_sorted_inside_bounds_and_weights_sum_to_width() {
    for n in [1, 2, 5, 20, 21] {
        let (x, w) = gauss_legendre(n, 0.2, 3.7).unwrap();
        assert_eq!(x.len(), n);
        assert_eq!(w.len(), n);
        assert!(x.windows(2).all(|p| p[1] > p[0]), "unsorted nodes for n = {n}");
        assert!(x.iter().all(|&t| t > 0.2 && t < 3.7));
        assert!(w.iter().all(|&v| v > 0.0));
        assert_abs_diff_eq!(w.iter().sum::<f64>(), 3.5, epsilon = 1e-12);
    }
}

/* ──────────────────────────────────────────────────────────────────────────
2) Interpolation — inside the grid and linear extension outside
────────────────────────────────────────────────────────────────────────── */

#[test]
fn interpolates_and_extends_edge_segments() {
    let grid = [0.0, 1.0, 2.0];
    let vals = [0.0, 10.0, 20.0];
    let f = LinInterp::new(&grid, &vals).unwrap();

    assert_abs_diff_eq!(f.eval(0.5), 5.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f.eval(1.5), 15.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f.eval(-1.0), -10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f.eval(3.0), 30.0, epsilon = 1e-12);
}

#[test]
fn extension_uses_nearest_segment_slope() {
    let grid = [0.0, 1.0, 3.0];
    let vals = [2.0, 0.0, 1.0];
    let f = LinInterp::new(&grid, &vals).unwrap();
    // Left slope -2, right slope 0.5.
    assert_abs_diff_eq!(f.eval(-0.5), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f.eval(5.0), 2.0, epsilon = 1e-12);

    let flat = f.with_extrapolation(Extrapolation::Flat);
    assert_eq!(flat.eval(-0.5), 2.0);
    assert_eq!(flat.eval(5.0), 1.0);
}

#[test]
fn many_lookups_on_fine_grid() {
    let grid: Vec<f64> = (0..1000).map(|i| i as f64 * 0.01).collect();
    let vals: Vec<f64> = grid.iter().map(|x| 3.0 * x - 1.0).collect();
    let f = LinInterp::new(&grid, &vals).unwrap();
    for k in 0..5000 {
        let x = -1.0 + k as f64 * 0.0025;
        assert_abs_diff_eq!(f.eval(x), 3.0 * x - 1.0, epsilon = 1e-9);
    }
}
