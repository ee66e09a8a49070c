/// Stochastic helpers: uniform and Bernoulli draws for sample paths.
/// Note: borrows `bevy_prng::WyRand` through a `RefCell` so the
/// simulator's per-step closures can stay `Fn`.
use bevy_prng::WyRand;
use rand_core::{RngCore, SeedableRng};
use std::cell::RefCell;

/// Seeded generator.
#[inline]
pub fn seeded(seed: u64) -> RefCell<WyRand> {
    RefCell::new(WyRand::from_seed(seed.to_le_bytes()))
}

/// Uniform on the open interval (0, 1), 53 bits of mantissa.
#[inline]
pub fn uniform01(rng: &RefCell<WyRand>) -> f64 {
    let bits = rng.borrow_mut().next_u64() >> 11;
    (bits as f64 + 0.5) / ((1u64 << 53) as f64)
}

/// Bernoulli(p) with WyRand.
#[inline]
pub fn bernoulli(rng: &RefCell<WyRand>, p: f64) -> bool {
    uniform01(rng) < p.clamp(0.0, 1.0)
}
