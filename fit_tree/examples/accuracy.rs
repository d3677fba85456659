//! Prediction accuracy and memory report for a range of epsilons
//! 不同 epsilon 下的预测精度与内存报告

use fit_tree::FitTree;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn main() {
  let size = 1_000_000;

  let mut rng = StdRng::seed_from_u64(42);
  let mut cur = 0u64;
  let data: Vec<u64> = (0..size)
    .map(|_| {
      cur += rng.random_range(1..100);
      cur
    })
    .collect();

  println!("{:>8} {:>10} {:>10} {:>10} {:>12}", "epsilon", "segments", "max_err", "avg_err", "mem_bytes");

  for eps in [16usize, 32, 64, 128, 256] {
    let tree = FitTree::new(&data, eps);

    let mut max_err = 0usize;
    let mut total_err = 0u64;
    for (i, &key) in data.iter().enumerate() {
      let err = tree.predict(key).abs_diff(i);
      max_err = max_err.max(err);
      total_err += err as u64;
    }

    println!(
      "{:>8} {:>10} {:>10} {:>10.3} {:>12}",
      eps,
      tree.segment_count(),
      max_err,
      total_err as f64 / size as f64,
      tree.mem_usage()
    );
  }
}
