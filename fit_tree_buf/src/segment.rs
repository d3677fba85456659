//! Buffered segment: a packed run of entries plus a bounded insert buffer
//! 缓冲段：紧凑的条目序列加一个有界插入缓冲区
//!
//! The packed run is immutable apart from tombstone flags, so model
//! predicted offsets stay valid across erases. Inserts land in a small
//! sorted buffer until it fills; the tree then merges and re-segments.

use fit_tree::{Key, Segment};

/// Entry: key, position payload, tombstone flag.
/// 条目：键、位置负载、墓碑标志。
#[derive(Clone, Copy, Debug)]
pub struct Item<K, P> {
  pub key: K,
  pub pos: P,
  deleted: bool,
}

impl<K, P> Item<K, P> {
  #[inline]
  pub fn new(key: K, pos: P) -> Self {
    Self {
      key,
      pos,
      deleted: false,
    }
  }

  #[inline]
  #[must_use]
  pub fn deleted(&self) -> bool {
    self.deleted
  }
}

/// Segment with a packed entry run and an insert buffer, both sorted by
/// key. Live keys are disjoint across the two.
/// 带紧凑条目序列和插入缓冲区的段，两者都按键排序。
/// 活跃键在两者之间不重叠。
#[derive(Clone, Debug)]
pub struct BufSeg<K: Key, P> {
  seg: Segment<K>,
  keys: Vec<Item<K, P>>,
  buffer: Vec<Item<K, P>>,
  cap: usize,
}

impl<K: Key + Ord, P: Copy> BufSeg<K, P> {
  pub fn new(seg: Segment<K>, keys: Vec<Item<K, P>>, cap: usize) -> Self {
    Self {
      seg,
      keys,
      buffer: Vec::with_capacity(cap),
      cap,
    }
  }

  #[inline]
  #[must_use]
  pub fn start_key(&self) -> K {
    self.seg.start_key
  }

  #[inline]
  #[must_use]
  pub fn end_key(&self) -> K {
    self.seg.end_key
  }

  #[inline]
  #[must_use]
  pub fn slope(&self) -> f64 {
    self.seg.slope
  }

  /// Packed plus buffered entry count, tombstones included.
  /// 紧凑加缓冲条目数，含墓碑。
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.keys.len() + self.buffer.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Index into the packed run of the first entry with key >= `key`,
  /// found by binary search inside the model predicted window.
  /// 紧凑序列中首个键不小于 `key` 的条目下标，
  /// 在模型预测窗口内二分查找得到。
  fn search(&self, key: K, error: usize) -> usize {
    let off = self.seg.predict_offset(key).min(self.keys.len());
    let hi = (off + error + 2).min(self.keys.len());
    let lo = off.saturating_sub(error).min(hi);
    lo + self.keys[lo..hi].partition_point(|it| it.key < key)
  }

  /// Live entry matching `key`, packed run first, then the buffer.
  /// 匹配 `key` 的活跃条目，先查紧凑序列，再查缓冲区。
  pub fn find(&self, key: K, error: usize) -> Option<&Item<K, P>> {
    let i = self.search(key, error);
    if let Some(it) = self.keys.get(i) {
      if it.key == key && !it.deleted {
        return Some(it);
      }
    }
    if let Ok(j) = self.buffer.binary_search_by(|it| it.key.cmp(&key)) {
      let it = &self.buffer[j];
      if !it.deleted {
        return Some(it);
      }
    }
    None
  }

  /// Mark the live entry matching `key` deleted. The entry physically
  /// remains until the next flush.
  /// 将匹配 `key` 的活跃条目标记为已删除。条目实体保留到下次刷新。
  pub fn erase(&mut self, key: K, error: usize) -> bool {
    let i = self.search(key, error);
    if let Some(it) = self.keys.get_mut(i) {
      if it.key == key && !it.deleted {
        it.deleted = true;
        return true;
      }
    }
    if let Ok(j) = self.buffer.binary_search_by(|it| it.key.cmp(&key)) {
      let it = &mut self.buffer[j];
      if !it.deleted {
        it.deleted = true;
        return true;
      }
    }
    false
  }

  /// Insert into the buffer, keeping it sorted. A tombstone with the same
  /// key revives in place. Returns false when the buffer is full.
  /// 插入缓冲区并保持有序。同键墓碑原地复活。缓冲区满时返回 false。
  pub fn insert_buffer(&mut self, key: K, pos: P) -> bool {
    let i = self.buffer.partition_point(|it| it.key < key);
    if let Some(it) = self.buffer.get_mut(i) {
      if it.key == key {
        it.pos = pos;
        it.deleted = false;
        return true;
      }
    }
    if self.buffer.len() >= self.cap {
      return false;
    }
    self.buffer.insert(i, Item::new(key, pos));
    true
  }

  /// Ordered fusion of all live entries with `extra` spliced in.
  /// 所有活跃条目的有序归并，并按序插入 `extra`。
  #[must_use]
  pub fn merge_live(&self, extra: (K, P)) -> Vec<(K, P)> {
    let mut out = Vec::with_capacity(self.keys.len() + self.buffer.len() + 1);
    let mut added = false;
    for it in self.iter() {
      if !added && extra.0 < it.key {
        out.push(extra);
        added = true;
      }
      out.push((it.key, it.pos));
    }
    if !added {
      out.push(extra);
    }
    out
  }

  /// Merged-order iterator over live entries.
  /// 按归并序迭代活跃条目。
  #[inline]
  pub fn iter(&self) -> SegIter<'_, K, P> {
    SegIter {
      keys: &self.keys,
      buffer: &self.buffer,
      ki: 0,
      bi: 0,
    }
  }

  /// Iterator positioned at the first live entry with key >= `key`.
  /// 定位到首个键不小于 `key` 的活跃条目的迭代器。
  pub(crate) fn iter_from(&self, key: K, error: usize) -> SegIter<'_, K, P> {
    SegIter {
      keys: &self.keys,
      buffer: &self.buffer,
      ki: self.search(key, error),
      bi: self.buffer.partition_point(|it| it.key < key),
    }
  }
}

/// Two-cursor merge over the packed run and the buffer, skipping
/// tombstones.
/// 在紧凑序列和缓冲区上双游标归并，跳过墓碑。
pub struct SegIter<'a, K, P> {
  keys: &'a [Item<K, P>],
  buffer: &'a [Item<K, P>],
  ki: usize,
  bi: usize,
}

impl<'a, K: Key + Ord, P: Copy> Iterator for SegIter<'a, K, P> {
  type Item = &'a Item<K, P>;

  fn next(&mut self) -> Option<Self::Item> {
    while self.ki < self.keys.len() && self.keys[self.ki].deleted {
      self.ki += 1;
    }
    while self.bi < self.buffer.len() && self.buffer[self.bi].deleted {
      self.bi += 1;
    }
    match (self.keys.get(self.ki), self.buffer.get(self.bi)) {
      (None, None) => None,
      (Some(a), None) => {
        self.ki += 1;
        Some(a)
      }
      (None, Some(b)) => {
        self.bi += 1;
        Some(b)
      }
      (Some(a), Some(b)) => {
        if a.key <= b.key {
          self.ki += 1;
          Some(a)
        } else {
          self.bi += 1;
          Some(b)
        }
      }
    }
  }
}
