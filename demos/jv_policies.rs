// demos/jv_policies.rs
// Run with:
//   RUST_LOG=jv_worker=debug cargo run --example jv_policies
//   RUST_LOG=jv_worker=debug cargo run --example jv_policies --features parallel

use jv_worker::{JvConfig, JvError, JvWorker, simulate_path};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), JvError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let wp = JvWorker::new(JvConfig::default())?;
    println!("{wp}");

    // A handful of hand-rolled operator applications; the stopping rule is ours.
    let n = wp.grid_size();
    let mut v: Vec<f64> = wp.x_grid().iter().map(|x| 0.5 * x).collect();
    let mut next = vec![0.0; n];
    for k in 0..40 {
        wp.bellman_value_into(&v, &mut next)?;
        let gap = v
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        std::mem::swap(&mut v, &mut next);
        if k % 10 == 9 {
            println!("iter {:>3}  sup|TV - V| = {gap:.6}", k + 1);
        }
    }

    let policy = wp.bellman_policies(&v)?;
    println!("\n{:>10} {:>10} {:>10} {:>10}", "x", "V(x)", "s(x)", "phi(x)");
    for i in (0..n).step_by(7) {
        println!(
            "{:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            wp.x_grid()[i], v[i], policy.s[i], policy.phi[i]
        );
    }

    let path = simulate_path(&wp, &policy, 0.1, 25, 7)?;
    let shown: Vec<String> = path.iter().map(|x| format!("{x:.3}")).collect();
    println!("\nsample path from x0 = 0.1:\n  {}", shown.join(" "));
    Ok(())
}
