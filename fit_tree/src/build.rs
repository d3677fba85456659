//! Shrinking-cone segmentation (online, single pass, O(N))
//! 收缩锥分段（在线、单次扫描、O(N)）

use std::ops::Range;

use fit_tree_lib::Wide;

use crate::{
  slope::{Point, Slope},
  types::{Key, Segment},
};

/// Online shrinking-cone model for one segment run. Created on its first
/// point; `add_point` answers whether the next point still fits within the
/// error bound.
/// 单个段的在线收缩锥模型。以第一个点创建；`add_point` 回答下一个点
/// 是否仍落在误差界内。
pub struct Plm<K: Key> {
  error: usize,
  first: Point<K>,
  start_pos: usize,
  last_key: K,
  lower: Slope<<K as Key>::Wide>,
  upper: Slope<<K as Key>::Wide>,
  count: usize,
}

impl<K: Key> Plm<K> {
  /// Open a model on its first point `(x, y)`.
  /// 用第一个点 `(x, y)` 打开模型。
  pub fn new(error: usize, x: K, y: usize) -> Self {
    Self {
      error,
      first: Point::new(x, <K as Key>::Wide::from_usize(y)),
      start_pos: y,
      last_key: x,
      lower: Slope::flat(),
      upper: Slope::vertical(),
      count: 1,
    }
  }

  /// Feed the next point. Returns false when it falls outside the cone;
  /// the caller then emits the segment and opens a new model on the
  /// rejected point.
  /// 送入下一个点。落在锥外时返回 false；调用方随后输出段，
  /// 并用被拒绝的点打开新模型。
  pub fn add_point(&mut self, x: K, y: usize) -> bool {
    let rank = <K as Key>::Wide::from_usize(y);
    let err = <K as Key>::Wide::from_usize(self.error);
    let above = Point::new(x, rank + err);
    let below = Point::new(x, rank - err);

    if self.count == 1 {
      self.lower = below - self.first;
      self.upper = above - self.first;
      self.last_key = x;
      self.count = 2;
      return true;
    }

    let slope = Point::new(x, rank) - self.first;
    if slope.lt(self.lower) || slope.gt(self.upper) {
      return false;
    }

    let upper = above - self.first;
    if upper.lt(self.upper) {
      self.upper = upper;
    }
    let lower = below - self.first;
    if lower.gt(self.lower) {
      self.lower = lower;
    }

    self.last_key = x;
    self.count += 1;
    true
  }

  /// Segment for the points accepted so far. The emitted slope is the cone
  /// midpoint, so every accepted point predicts within error + 1 after the
  /// cast to f64.
  /// 输出当前已接受点的段。斜率取锥体中线，转换到 f64 后
  /// 每个已接受点的预测误差不超过 error + 1。
  #[must_use]
  pub fn segment(&self) -> Segment<K> {
    let slope = if self.count == 1 {
      1.0
    } else {
      (self.upper.to_f64() + self.lower.to_f64()) / 2.0
    };
    Segment {
      start_key: self.first.x,
      start_pos: self.start_pos,
      end_key: self.last_key,
      slope,
    }
  }

  /// Points accepted so far
  /// 已接受的点数
  #[inline]
  #[must_use]
  pub fn points(&self) -> usize {
    self.count
  }
}

/// Walk `n` points through the shrinking cone. `at(i)` supplies the i-th
/// `(key, rank)` pair in non-decreasing key order; `emit` receives each
/// finished segment together with the input index range it was fitted on.
/// Duplicate keys coalesce to the earliest rank. Returns the segment count.
/// 将 n 个点送入收缩锥。`at(i)` 按键非递减顺序给出第 i 个 `(键, 名次)` 对；
/// `emit` 接收每个完成的段及其拟合的输入下标区间。
/// 重复键合并到最早的名次。返回段数。
pub fn for_each_segment<K, F, G>(n: usize, error: usize, mut at: F, mut emit: G) -> usize
where
  K: Key,
  F: FnMut(usize) -> (K, usize),
  G: FnMut(Segment<K>, Range<usize>),
{
  if n == 0 {
    return 0;
  }

  let (first_key, first_pos) = at(0);
  let mut plm = Plm::new(error, first_key, first_pos);
  let mut cur_key = first_key;
  let mut start = 0;
  let mut count = 0;

  for i in 1..n {
    let (key, pos) = at(i);
    if key == cur_key {
      continue;
    }
    cur_key = key;
    if !plm.add_point(key, pos) {
      emit(plm.segment(), start..i);
      plm = Plm::new(error, key, pos);
      start = i;
      count += 1;
    }
  }

  emit(plm.segment(), start..n);
  count + 1
}

/// Segment a sorted slice, rank = index.
/// 对已排序切片分段，名次 = 下标。
#[must_use]
pub fn build_segments<K: Key>(sorted: &[K], error: usize) -> Vec<Segment<K>> {
  let estimated = (sorted.len() / (error * 2).max(1)).max(16);
  let mut segments = Vec::with_capacity(estimated);
  for_each_segment(
    sorted.len(),
    error,
    |i| (sorted[i], i),
    |seg, _| segments.push(seg),
  );
  segments
}
