//! Ordered segment store keyed by segment start key
//! 按段起始键排序的段存储

use std::{
  collections::{BTreeMap, btree_map},
  ops::Bound,
};

/// Ordered map from segment start key to segment, kept ascending.
/// Answers "greatest start <= probe" in O(log n) as a predecessor query;
/// a descending map with a reversed comparator would be equivalent.
/// 从段起始键到段的有序映射，按升序保存。以前驱查询在 O(log n) 内
/// 回答“不大于探测键的最大起始键”；用反向比较器按降序保存等价。
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
#[derive(Clone, Debug, Default)]
pub struct SegStore<K, S> {
  map: BTreeMap<K, S>,
}

impl<K: Ord + Copy, S> SegStore<K, S> {
  #[must_use]
  pub fn new() -> Self {
    Self {
      map: BTreeMap::new(),
    }
  }

  /// Bulk load from pairs already sorted by start key.
  /// 从已按起始键排序的键值对批量装载。
  #[must_use]
  pub fn bulk_load(pairs: impl IntoIterator<Item = (K, S)>) -> Self {
    Self {
      map: pairs.into_iter().collect(),
    }
  }

  /// Segment with the greatest start key <= `key`.
  /// 起始键不大于 `key` 的最大段。
  #[inline]
  #[must_use]
  pub fn locate(&self, key: K) -> Option<&S> {
    self.map.range(..=key).next_back().map(|(_, s)| s)
  }

  /// Segment with the smallest start key.
  /// 起始键最小的段。
  #[inline]
  #[must_use]
  pub fn first(&self) -> Option<&S> {
    self.map.values().next()
  }

  #[inline]
  pub fn get_mut(&mut self, key: K) -> Option<&mut S> {
    self.map.get_mut(&key)
  }

  pub fn insert(&mut self, key: K, seg: S) {
    self.map.insert(key, seg);
  }

  /// Replace one segment with a sorted run of new segments. Used by the
  /// buffered tree when a flush re-segments a merged keyspace.
  /// 用一组排序好的新段替换一个旧段。缓冲树在刷新重分段时使用。
  pub fn replace(&mut self, old: K, new: impl IntoIterator<Item = (K, S)>) {
    self.map.remove(&old);
    for (k, s) in new {
      self.map.insert(k, s);
    }
  }

  /// Segments in ascending start key order. Double-ended.
  /// 按起始键升序迭代所有段。支持双向。
  #[inline]
  pub fn iter(&self) -> btree_map::Iter<'_, K, S> {
    self.map.iter()
  }

  #[inline]
  pub fn values(&self) -> btree_map::Values<'_, K, S> {
    self.map.values()
  }

  /// Segments with start key strictly greater than `key`.
  /// 起始键严格大于 `key` 的段。
  #[inline]
  pub fn after(&self, key: K) -> btree_map::Range<'_, K, S> {
    self.map.range((Bound::Excluded(key), Bound::Unbounded))
  }

  /// All segments as a double-ended range.
  /// 所有段的双向范围。
  #[inline]
  pub fn range_all(&self) -> btree_map::Range<'_, K, S> {
    self.map.range(..)
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.map.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}
