//! FITing-Tree core: a learned index over sorted keys (no data ownership)
//! FITing-Tree 核心：基于已排序键的学习索引（不持有数据）
//!
//! A single pass of the shrinking-cone algorithm fits one linear segment
//! per run of keys whose ranks stay within `epsilon` of a line. A query
//! returns an approximate rank plus the window a classical sorted search
//! needs to finish the lookup.

#![allow(clippy::cast_precision_loss)]

use std::{mem::size_of, ops::Range};

pub mod build;
pub mod consts;
#[cfg(feature = "data")]
pub mod data;
mod slope;
pub mod store;
pub mod types;

#[cfg(feature = "data")]
pub use data::FitData;
pub use fit_tree_lib::{Error, Result};

pub use self::{
  build::{Plm, build_segments, for_each_segment},
  consts::{DEFAULT_BUFFER, DEFAULT_EPSILON},
  store::SegStore,
  types::{ApproxPos, FitStats, Key, Pos, Segment},
};

/// FITing-Tree core structure (no data ownership, serializable)
/// FITing-Tree 核心结构（不持有数据，可序列化）
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
#[derive(Clone, Debug)]
pub struct FitTree<K: Key + Ord> {
  epsilon: usize,
  len: usize,
  store: SegStore<K, Segment<K>>,
}

impl<K: Key + Ord> FitTree<K> {
  /// Build from a sorted key slice (O(N) build time). Panics when
  /// `epsilon` is zero; unsorted input is a contract violation checked in
  /// debug builds.
  /// 从已排序键切片构建（O(N) 构建时间）。`epsilon` 为零时 panic；
  /// 未排序输入违反契约，仅在调试构建中检查。
  #[must_use]
  pub fn new(sorted: &[K], epsilon: usize) -> Self {
    match Self::try_new(sorted, epsilon) {
      Ok(t) => t,
      Err(e) => panic!("{e}"),
    }
  }

  /// Fallible build, rejecting invalid parameters.
  /// 可失败的构建，拒绝非法参数。
  pub fn try_new(sorted: &[K], epsilon: usize) -> Result<Self> {
    if epsilon == 0 {
      return Err(Error::ZeroEpsilon);
    }
    debug_assert!(sorted.is_sorted_by(|a, b| a <= b));

    let estimated = (sorted.len() / (epsilon * 2).max(1)).max(16);
    let mut pairs = Vec::with_capacity(estimated);
    for_each_segment(
      sorted.len(),
      epsilon,
      |i| (sorted[i], i),
      |seg, _| pairs.push((seg.start_key, seg)),
    );

    Ok(Self {
      epsilon,
      len: sorted.len(),
      store: SegStore::bulk_load(pairs),
    })
  }

  /// Approximate rank of `key` and the window `[lo, hi)` that contains its
  /// true rank when present. The window carries the slope rounding slack,
  /// so `lower_bound` over `sorted[lo..hi]` is always conclusive.
  /// 键的近似名次及包含其真实名次的窗口 `[lo, hi)`。窗口带有
  /// 斜率舍入余量，在 `sorted[lo..hi]` 上做下界查找总能得出结论。
  #[must_use]
  pub fn approx_pos(&self, key: K) -> ApproxPos {
    if self.len == 0 {
      return ApproxPos { pos: 0, lo: 0, hi: 0 };
    }
    let Some(seg) = self.store.locate(key) else {
      // key precedes the first segment
      return ApproxPos {
        pos: 0,
        lo: 0,
        hi: self.epsilon.min(self.len),
      };
    };

    let pos = seg.predict(key);
    // key larger than the index covers, or the prediction overflowed
    if (key > seg.end_key && self.store.after(seg.start_key).next().is_none())
      || pos > self.len + self.epsilon
    {
      return ApproxPos {
        pos: self.len - 1,
        lo: self.len - 1,
        hi: self.len,
      };
    }

    ApproxPos {
      pos,
      lo: pos.saturating_sub(self.epsilon),
      hi: (pos + self.epsilon + 2).min(self.len),
    }
  }

  /// Predicted rank for a key
  /// 预测键的名次
  #[inline]
  #[must_use]
  pub fn predict(&self, key: K) -> usize {
    self.approx_pos(key).pos
  }

  /// Predicted search range [start, end) for a key
  /// 预测键的搜索范围 [start, end)
  #[inline]
  #[must_use]
  pub fn predict_range(&self, key: K) -> Range<usize> {
    let a = self.approx_pos(key);
    a.lo..a.hi
  }

  /// Find the insertion index of `key` via prediction + binary search.
  /// `get_key` reads the sorted data at an index; the result is the first
  /// index whose key is not less than `key` (like `partition_point`).
  /// 通过预测 + 二分查找得到键的插入下标。`get_key` 读取给定下标处的
  /// 已排序数据；结果是首个键不小于 `key` 的下标（类似 `partition_point`）。
  #[inline]
  pub fn find_key<F>(&self, key: K, get_key: F) -> usize
  where
    F: Fn(usize) -> Option<K>,
  {
    let range = self.predict_range(key);
    let mut left = range.start;
    let mut right = range.end;
    while left < right {
      let mid = left + (right - left) / 2;
      match get_key(mid) {
        Some(k) if k < key => left = mid + 1,
        _ => right = mid,
      }
    }
    left
  }

  /// Data length
  /// 数据长度
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  #[inline]
  #[must_use]
  pub fn epsilon(&self) -> usize {
    self.epsilon
  }

  #[inline]
  #[must_use]
  pub fn segment_count(&self) -> usize {
    self.store.len()
  }

  /// Segments in ascending start key order
  /// 按起始键升序迭代所有段
  #[inline]
  pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Segment<K>> {
    self.store.values()
  }

  #[inline]
  #[must_use]
  pub fn avg_segment_size(&self) -> f64 {
    self.len as f64 / self.store.len().max(1) as f64
  }

  /// Memory usage estimate (excluding data)
  /// 内存占用估计（不含数据）
  #[inline]
  #[must_use]
  pub fn mem_usage(&self) -> usize {
    self.store.len() * (size_of::<K>() + size_of::<Segment<K>>())
  }

  /// Get statistics
  /// 获取统计信息
  #[inline]
  #[must_use]
  pub fn stats(&self) -> FitStats {
    FitStats {
      segments: self.segment_count(),
      avg_segment_size: self.avg_segment_size(),
      memory_bytes: self.mem_usage(),
    }
  }
}
