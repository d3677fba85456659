//! Tests for FitData (with data ownership)
//! FitData 测试（持有数据）

#![cfg(feature = "data")]

use aok::{OK, Void};
use fit_tree::FitData;
use log::trace;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[test]
fn test_basic() -> Void {
  let sorted: Vec<u64> = (0..20_000).collect();
  let idx = FitData::new(&sorted, 32);

  assert_eq!(idx.get(0), Some(0));
  assert_eq!(idx.get(12_345), Some(12_345));
  assert_eq!(idx.get(19_999), Some(19_999));
  assert_eq!(idx.get(20_000), None);

  trace!("basic passed");
  OK
}

#[test]
fn test_epsilon_sweep() -> Void {
  let sorted: Vec<u64> = (0..50_000).map(|i| i * 3).collect();

  for &eps in &[1usize, 4, 16, 64, 256] {
    let idx = FitData::new(&sorted, eps);
    assert!(idx.segment_count() >= 1);

    for &k in &[0u64, 3, 74_997, 149_997] {
      assert_eq!(idx.get(k), Some((k / 3) as usize), "eps={eps}, key={k}");
    }
    assert_eq!(idx.get(1), None, "eps={eps}");
  }

  trace!("epsilon_sweep passed");
  OK
}

#[test]
fn test_lower_bound() -> Void {
  let sorted: Vec<u64> = (0..1000).step_by(2).collect();
  let idx = FitData::new(&sorted, 16);

  assert_eq!(idx.lower_bound(0), 0);
  assert_eq!(idx.lower_bound(499), 250);
  assert_eq!(idx.lower_bound(998), 499);
  // beyond the largest key
  assert_eq!(idx.lower_bound(999), 500);
  assert_eq!(idx.lower_bound(u64::MAX), 500);
  OK
}

#[test]
fn test_duplicates_first_occurrence() -> Void {
  let sorted = vec![1u64, 1, 1, 2, 2, 3, 3, 3, 3, 9];
  let idx = FitData::new(&sorted, 2);

  assert_eq!(idx.get(1), Some(0));
  assert_eq!(idx.get(2), Some(3));
  assert_eq!(idx.get(3), Some(5));
  assert_eq!(idx.get(9), Some(9));
  assert_eq!(idx.get(4), None);
  OK
}

#[test]
fn test_batch() -> Void {
  let sorted: Vec<u64> = (0..10_000).collect();
  let idx = FitData::new(&sorted, 32);

  let keys: Vec<u64> = (100..200).collect();
  let hits: Vec<_> = idx.get_many(keys.iter().copied()).collect();
  for (i, r) in hits.iter().enumerate() {
    assert_eq!(*r, Some(100 + i));
  }

  let mixed: Vec<u64> = (9_995..10_005).collect();
  assert_eq!(idx.count_hits(mixed.iter().copied()), 5);

  trace!("batch passed");
  OK
}

#[test]
fn test_empty() -> Void {
  let idx: FitData<u64> = FitData::new(&[], 8);
  assert!(idx.get(123).is_none());
  assert_eq!(idx.lower_bound(123), 0);
  OK
}

#[test]
fn test_stats() -> Void {
  let sorted: Vec<u64> = (0..100_000).collect();
  let idx = FitData::new(&sorted, 32);

  let stats = idx.stats();
  assert!(stats.segments >= 1);
  assert!(stats.avg_segment_size > 0.0);
  assert!(stats.memory_bytes >= 800_000);

  trace!("mem={} bytes", stats.memory_bytes);
  OK
}

#[test]
fn test_random_gaps() -> Void {
  let mut rng = StdRng::seed_from_u64(12_345);
  let mut cur = 0u64;
  let sorted: Vec<u64> = (0..100_000)
    .map(|_| {
      cur += rng.random_range(1..1000);
      cur
    })
    .collect();

  let idx = FitData::new(&sorted, 32);

  for (i, &k) in sorted.iter().enumerate() {
    assert_eq!(idx.get(k), Some(i), "key={k}");
  }
  for _ in 0..1000 {
    let k = rng.random::<u64>();
    let exists = sorted.binary_search(&k).is_ok();
    assert_eq!(idx.get(k).is_some(), exists, "key={k}");
  }

  trace!("random_gaps passed, n={}", sorted.len());
  OK
}

#[test]
fn test_extreme_gaps() -> Void {
  let mut rng = StdRng::seed_from_u64(42);

  for size in [1usize, 10, 128, 1000, 10_000] {
    let max_jump = u64::MAX / (size as u64);
    let mut cur = 0u64;
    let sorted: Vec<u64> = (0..size)
      .map(|_| {
        cur = cur.saturating_add(rng.random_range(1..=max_jump));
        cur
      })
      .collect();

    let idx = FitData::new(&sorted, 16);
    for (i, &k) in sorted.iter().enumerate() {
      assert_eq!(idx.get(k), Some(i), "size={size}, rank={i}");
    }
  }

  trace!("extreme_gaps passed");
  OK
}
