//! Tests for the shrinking-cone segmentation
//! 收缩锥分段测试

use aok::{OK, Void};
use fit_tree::{Key, Plm, build_segments, for_each_segment};
use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Binomial, Distribution, Geometric, LogNormal};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

/// Every key must predict within error + 1 of the rank of its first
/// occurrence.
/// 每个键的预测必须在其首次出现名次的 error + 1 以内。
fn check_bound<K: Key>(data: &[K], error: usize) {
  let segments = build_segments(data, error);
  if data.is_empty() {
    assert!(segments.is_empty());
    return;
  }
  assert!(!segments.is_empty());

  let mut si = 0;
  for (i, &k) in data.iter().enumerate() {
    if i != 0 && data[i - 1] == k {
      continue;
    }
    while si + 1 < segments.len() && !(k < segments[si + 1].start_key) {
      si += 1;
    }
    let pred = segments[si].predict(k) as f64;
    let off = (pred - i as f64).abs();
    assert!(
      off <= (error + 1) as f64,
      "rank={i} pred={pred} error={error}"
    );
  }
}

#[test]
fn test_uniform_dense() -> Void {
  let mut rng = StdRng::seed_from_u64(42);
  let mut data: Vec<u64> = (0..200_000).map(|_| rng.random_range(0..10_000)).collect();
  data.sort_unstable();

  for &eps in &[16usize, 32, 64] {
    check_bound(&data, eps);
  }

  trace!("uniform_dense passed");
  OK
}

#[test]
fn test_uniform_sparse() -> Void {
  let mut rng = StdRng::seed_from_u64(42);
  let mut data: Vec<u64> = (0..200_000)
    .map(|_| rng.random_range(0..10_000_000))
    .collect();
  data.sort_unstable();

  for &eps in &[16usize, 32, 64] {
    check_bound(&data, eps);
  }

  trace!("uniform_sparse passed");
  OK
}

#[test]
fn test_binomial() -> Void {
  let mut rng = StdRng::seed_from_u64(7);
  let dist = Binomial::new(50_000, 0.5).unwrap();
  let mut data: Vec<u64> = (0..200_000).map(|_| dist.sample(&mut rng)).collect();
  data.sort_unstable();

  check_bound(&data, 32);

  trace!("binomial passed");
  OK
}

#[test]
fn test_geometric() -> Void {
  let mut rng = StdRng::seed_from_u64(7);
  let dist = Geometric::new(0.8).unwrap();
  let mut data: Vec<u64> = (0..200_000).map(|_| dist.sample(&mut rng)).collect();
  data.sort_unstable();

  check_bound(&data, 32);

  trace!("geometric passed");
  OK
}

#[test]
fn test_lognormal_f64() -> Void {
  let mut rng = StdRng::seed_from_u64(9);
  let dist = LogNormal::new(0.0, 0.5).unwrap();
  let mut data: Vec<f64> = (0..200_000).map(|_| dist.sample(&mut rng)).collect();
  data.sort_unstable_by(|a, b| a.total_cmp(b));

  check_bound(&data, 64);

  trace!("lognormal passed");
  OK
}

#[test]
fn test_quadratic() -> Void {
  let data: Vec<u64> = (0..100_000u64).map(|i| i * i).collect();

  for &eps in &[4usize, 16, 64] {
    check_bound(&data, eps);
  }

  trace!("quadratic passed");
  OK
}

#[test]
fn test_coverage() -> Void {
  let mut rng = StdRng::seed_from_u64(3);
  let mut data: Vec<u32> = (0..50_000).map(|_| rng.random_range(0..100_000)).collect();
  data.sort_unstable();

  let mut spans = Vec::new();
  let count = for_each_segment(data.len(), 16, |i| (data[i], i), |seg, r| spans.push((seg, r)));
  assert_eq!(count, spans.len());

  // spans partition the input
  assert_eq!(spans[0].1.start, 0);
  assert_eq!(spans[spans.len() - 1].1.end, data.len());
  for w in spans.windows(2) {
    assert_eq!(w[0].1.end, w[1].1.start);
    // starts strictly increase, segments never overlap
    assert!(w[0].0.start_key < w[1].0.start_key);
    assert!(w[0].0.end_key < w[1].0.start_key);
  }
  for (seg, r) in &spans {
    assert_eq!(seg.start_key, data[r.start]);
    assert_eq!(seg.start_pos, r.start);
    assert_eq!(seg.end_key, data[r.end - 1]);
    assert!(!(seg.end_key < seg.start_key));
  }

  trace!("coverage passed, segments={}", spans.len());
  OK
}

#[test]
fn test_empty() -> Void {
  let data: Vec<u64> = vec![];
  assert!(build_segments(&data, 16).is_empty());
  OK
}

#[test]
fn test_single() -> Void {
  let segments = build_segments(&[42u64], 16);
  assert_eq!(segments.len(), 1);
  assert_eq!(segments[0].start_key, 42);
  assert_eq!(segments[0].end_key, 42);
  assert_eq!(segments[0].start_pos, 0);
  assert_eq!(segments[0].slope, 1.0);
  OK
}

#[test]
fn test_all_equal() -> Void {
  let data = vec![7u64; 1000];
  let segments = build_segments(&data, 4);
  assert_eq!(segments.len(), 1);
  assert_eq!(segments[0].start_key, 7);
  assert_eq!(segments[0].end_key, 7);
  assert_eq!(segments[0].slope, 1.0);
  OK
}

#[test]
fn test_plm_single_point() -> Void {
  let plm: Plm<u64> = Plm::new(8, 100, 0);
  let seg = plm.segment();
  assert_eq!(plm.points(), 1);
  assert_eq!(seg.start_key, 100);
  assert_eq!(seg.end_key, 100);
  assert_eq!(seg.slope, 1.0);
  OK
}

#[test]
fn test_plm_reject() -> Void {
  // rank jumps far off the line once the cone has tightened
  let mut plm: Plm<u64> = Plm::new(1, 0, 0);
  assert!(plm.add_point(1, 1));
  assert!(plm.add_point(2, 2));
  assert!(!plm.add_point(3, 100));
  assert_eq!(plm.points(), 3);

  let seg = plm.segment();
  assert_eq!(seg.start_key, 0);
  assert_eq!(seg.end_key, 2);
  for (k, rank) in [(0u64, 0usize), (1, 1), (2, 2)] {
    let off = (seg.predict(k) as f64 - rank as f64).abs();
    assert!(off <= 2.0, "k={k} off={off}");
  }
  OK
}

#[test]
fn test_plm_cone_tightens() -> Void {
  // a perfectly linear run is never rejected
  let mut plm: Plm<u64> = Plm::new(2, 0, 0);
  for i in 1..10_000u64 {
    assert!(plm.add_point(i * 3, i as usize));
  }
  let seg = plm.segment();
  assert!((seg.slope - 1.0 / 3.0).abs() < 1e-9);
  OK
}

#[test]
fn test_segment_count_vs_epsilon() -> Void {
  let mut rng = StdRng::seed_from_u64(11);
  let mut data: Vec<u64> = (0..100_000)
    .map(|_| rng.random_range(0..1_000_000))
    .collect();
  data.sort_unstable();

  let small = build_segments(&data, 8).len();
  let large = build_segments(&data, 128).len();
  assert!(small >= large);

  trace!("segments: eps=8 {small}, eps=128 {large}");
  OK
}
