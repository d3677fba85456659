//! FITing-Tree with data ownership
//! 持有数据的 FITing-Tree

use std::{mem::size_of, ops::Deref};

use crate::{FitTree, Key, types::FitStats};

/// FITing-Tree with data ownership
/// 持有数据的 FITing-Tree
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
#[derive(Clone, Debug)]
pub struct FitData<K: Key + Ord> {
  pub fit: FitTree<K>,
  pub sorted: Vec<K>,
}

impl<K: Key + Ord> Deref for FitData<K> {
  type Target = FitTree<K>;

  #[inline]
  fn deref(&self) -> &Self::Target {
    &self.fit
  }
}

impl<K: Key + Ord> FitData<K> {
  /// Create from a sorted data slice
  /// 从已排序数据切片创建
  #[must_use]
  pub fn new(sorted: &[K], epsilon: usize) -> Self {
    let fit = FitTree::new(sorted, epsilon);
    Self {
      fit,
      sorted: sorted.to_vec(),
    }
  }

  /// Get reference to underlying data
  /// 获取底层数据引用
  #[inline]
  #[must_use]
  pub fn sorted(&self) -> &[K] {
    &self.sorted
  }

  /// Insertion index of `key`: the rank of its first occurrence when
  /// present, otherwise where it would be inserted.
  /// 键的插入下标：存在时为其首次出现的名次，否则为应插入的位置。
  #[inline]
  #[must_use]
  pub fn lower_bound(&self, key: K) -> usize {
    // SAFETY: find_key probes indices inside the predicted window, which
    // approx_pos clamps to [0, len).
    self
      .fit
      .find_key(key, |i| unsafe { Some(*self.sorted.get_unchecked(i)) })
  }

  /// Rank of `key` (None if absent); duplicates resolve to the first
  /// occurrence.
  /// 键的名次（不存在则返回 None）；重复键解析到首次出现。
  #[inline]
  #[must_use]
  pub fn get(&self, key: K) -> Option<usize> {
    let idx = self.lower_bound(key);
    // SAFETY: idx checked against len() before access
    if idx < self.sorted.len() && unsafe { *self.sorted.get_unchecked(idx) } == key {
      Some(idx)
    } else {
      None
    }
  }

  /// Batch lookup returning an iterator
  /// 批量查找（返回迭代器）
  #[inline]
  pub fn get_many<'a, I>(&'a self, keys: I) -> impl Iterator<Item = Option<usize>> + 'a
  where
    I: IntoIterator<Item = K> + 'a,
    <I as IntoIterator>::IntoIter: 'a,
  {
    keys.into_iter().map(move |k| self.get(k))
  }

  /// Count hits in batch
  /// 批量命中计数
  #[inline]
  pub fn count_hits<I>(&self, keys: I) -> usize
  where
    I: IntoIterator<Item = K>,
  {
    keys.into_iter().filter(|&k| self.get(k).is_some()).count()
  }

  /// Memory usage (including data)
  /// 内存占用（含数据）
  #[inline]
  #[must_use]
  pub fn memory_usage(&self) -> usize {
    self.sorted.len() * size_of::<K>() + self.fit.mem_usage()
  }

  /// Get statistics
  /// 获取统计信息
  #[inline]
  #[must_use]
  pub fn stats(&self) -> FitStats {
    FitStats {
      segments: self.fit.segment_count(),
      avg_segment_size: self.fit.avg_segment_size(),
      memory_bytes: self.memory_usage(),
    }
  }
}
