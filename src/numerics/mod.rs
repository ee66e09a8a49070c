pub mod interp;
pub mod quadrature;
pub mod stoch;

pub use interp::*;
pub use quadrature::*;

/// `n` evenly spaced points from `lo` to `hi`, both ends included.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| lo + step * i as f64).collect();
            out[n - 1] = hi;
            out
        }
    }
}
