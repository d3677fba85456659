//! Buffered FITing-Tree: an updatable learned index
//! 缓冲 FITing-Tree：可更新的学习索引
//!
//! The error budget splits between the model and a per-segment insert
//! buffer: segmentation runs at `epsilon - buffer`, so buffered inserts
//! can never push a live key outside the `epsilon` search window. When a
//! buffer fills, only that segment's keyspace is merged and re-segmented.

use std::collections::btree_map;

pub mod segment;

pub use fit_tree::{DEFAULT_BUFFER, DEFAULT_EPSILON, Key, Pos, SegStore, Segment};
pub use fit_tree_lib::{Error, Result};

pub use self::segment::{BufSeg, Item, SegIter};

/// Buffered FITing-Tree over keys `K` with position payloads `P`.
/// 以键 `K`、位置负载 `P` 为参数的缓冲 FITing-Tree。
#[derive(Clone, Debug)]
pub struct BufTree<K: Key + Ord, P: Pos> {
  epsilon: usize,
  buffer: usize,
  live: usize,
  store: SegStore<K, BufSeg<K, P>>,
}

impl<K: Key + Ord, P: Pos> BufTree<K, P> {
  /// Build from a sorted key slice, payload = rank. Panics unless
  /// `epsilon > buffer > 0`; unsorted input is a contract violation
  /// checked in debug builds.
  /// 从已排序键切片构建，负载 = 名次。除非 `epsilon > buffer > 0`
  /// 否则 panic；未排序输入违反契约，仅在调试构建中检查。
  #[must_use]
  pub fn new(sorted: &[K], epsilon: usize, buffer: usize) -> Self {
    match Self::try_new(sorted, epsilon, buffer) {
      Ok(t) => t,
      Err(e) => panic!("{e}"),
    }
  }

  /// Fallible build, rejecting invalid parameters.
  /// 可失败的构建，拒绝非法参数。
  pub fn try_new(sorted: &[K], epsilon: usize, buffer: usize) -> Result<Self> {
    if epsilon == 0 {
      return Err(Error::ZeroEpsilon);
    }
    if buffer == 0 || buffer >= epsilon {
      return Err(Error::BadBuffer { buffer, epsilon });
    }
    debug_assert!(sorted.is_sorted_by(|a, b| a <= b));

    let seg_error = epsilon - buffer;

    // Coalesce duplicates up front: the model is fed packed ranks so its
    // predictions index the packed vectors, while payloads keep the rank
    // of the first occurrence in the input.
    let mut dedup: Vec<(K, P)> = Vec::with_capacity(sorted.len());
    for (i, &k) in sorted.iter().enumerate() {
      if dedup.last().is_none_or(|&(prev, _)| prev != k) {
        dedup.push((k, P::from_usize(i)));
      }
    }

    let mut pairs = Vec::new();
    fit_tree::for_each_segment(
      dedup.len(),
      seg_error,
      |i| (dedup[i].0, i),
      |seg, range| {
        let items = dedup[range].iter().map(|&(k, p)| Item::new(k, p)).collect();
        pairs.push((seg.start_key, BufSeg::new(seg, items, buffer)));
      },
    );

    Ok(Self {
      epsilon,
      buffer,
      live: dedup.len(),
      store: SegStore::bulk_load(pairs),
    })
  }

  /// Segment responsible for `key`: greatest start <= key, or the first
  /// segment when the key precedes every start.
  /// 负责 `key` 的段：不大于该键的最大起始键，
  /// 键先于所有起始键时取第一个段。
  fn locate(&self, key: K) -> Option<&BufSeg<K, P>> {
    self.store.locate(key).or_else(|| self.store.first())
  }

  /// Start key of the segment responsible for `key`.
  /// 负责 `key` 的段的起始键。
  fn locate_start(&self, key: K) -> Option<K> {
    self.locate(key).map(|s| s.start_key())
  }

  /// Live entry for `key`, or None.
  /// 键对应的活跃条目，不存在则返回 None。
  #[must_use]
  pub fn find(&self, key: K) -> Option<(K, P)> {
    let seg = self.locate(key)?;
    seg.find(key, self.epsilon).map(|it| (it.key, it.pos))
  }

  /// Iterator over live entries from the smallest key >= `key` onward.
  /// Empty when no such key exists.
  /// 从不小于 `key` 的最小键开始迭代活跃条目。不存在时为空。
  #[must_use]
  pub fn lower_bound(&self, key: K) -> Iter<'_, K, P> {
    let Some(seg) = self.locate(key) else {
      return self.iter();
    };
    Iter {
      cur: Some(seg.iter_from(key, self.epsilon)),
      rest: self.store.after(seg.start_key()),
    }
  }

  /// Insert `(key, pos)`. A key that is already live is left untouched.
  /// When the target buffer is full, the segment's live entries and its
  /// buffer are merged and re-segmented at the reduced error, and the
  /// result replaces the segment in the store.
  /// 插入 `(key, pos)`。已活跃的键保持不变。目标缓冲区满时，
  /// 该段的活跃条目与缓冲区归并后按缩减误差重新分段，
  /// 结果替换存储中的原段。
  pub fn insert(&mut self, key: K, pos: P) {
    if self.find(key).is_some() {
      return;
    }

    let Some(start) = self.locate_start(key) else {
      // empty tree: open a one-key segment
      let seg = Segment {
        start_key: key,
        start_pos: 0,
        end_key: key,
        slope: 1.0,
      };
      let cap = self.buffer;
      self
        .store
        .insert(key, BufSeg::new(seg, vec![Item::new(key, pos)], cap));
      self.live += 1;
      return;
    };

    let seg_error = self.epsilon - self.buffer;
    let cap = self.buffer;
    if let Some(seg) = self.store.get_mut(start) {
      if seg.insert_buffer(key, pos) {
        self.live += 1;
        return;
      }

      // flush: ranks are local to the merged run, so each replacement
      // model predicts offsets into its own packed vector
      let merged = seg.merge_live((key, pos));
      let mut new_segs = Vec::new();
      fit_tree::for_each_segment(
        merged.len(),
        seg_error,
        |i| (merged[i].0, i),
        |s, range| {
          let items = merged[range].iter().map(|&(k, p)| Item::new(k, p)).collect();
          new_segs.push((s.start_key, BufSeg::new(s, items, cap)));
        },
      );
      self.store.replace(start, new_segs);
      self.live += 1;
    }
  }

  /// Mark `key` deleted. Missing keys are a silent no-op.
  /// 将键标记为已删除。键不存在时静默忽略。
  pub fn erase(&mut self, key: K) {
    let eps = self.epsilon;
    let Some(start) = self.locate_start(key) else {
      return;
    };
    if let Some(seg) = self.store.get_mut(start) {
      if seg.erase(key, eps) {
        self.live -= 1;
      }
    }
  }

  /// Ordered iterator over all live entries.
  /// 按键序迭代所有活跃条目。
  #[must_use]
  pub fn iter(&self) -> Iter<'_, K, P> {
    Iter {
      cur: None,
      rest: self.store.range_all(),
    }
  }

  /// Live entry count
  /// 活跃条目数
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.live
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.live == 0
  }

  /// Total error budget
  /// 总误差预算
  #[inline]
  #[must_use]
  pub fn epsilon(&self) -> usize {
    self.epsilon
  }

  /// Error the segmenter runs at: epsilon - buffer
  /// 分段器使用的误差：epsilon - buffer
  #[inline]
  #[must_use]
  pub fn seg_error(&self) -> usize {
    self.epsilon - self.buffer
  }

  /// Per-segment buffer capacity
  /// 每段缓冲区容量
  #[inline]
  #[must_use]
  pub fn buffer_capacity(&self) -> usize {
    self.buffer
  }

  #[inline]
  #[must_use]
  pub fn segment_count(&self) -> usize {
    self.store.len()
  }
}

/// Ordered iterator over live entries: the current in-segment merge plus
/// the remaining segments in ascending start key order.
/// 活跃条目的有序迭代器：当前段内归并游标加按起始键升序的剩余段。
pub struct Iter<'a, K: Key + Ord, P: Pos> {
  cur: Option<SegIter<'a, K, P>>,
  rest: btree_map::Range<'a, K, BufSeg<K, P>>,
}

impl<K: Key + Ord, P: Pos> Iterator for Iter<'_, K, P> {
  type Item = (K, P);

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(cur) = &mut self.cur {
        if let Some(it) = cur.next() {
          return Some((it.key, it.pos));
        }
      }
      match self.rest.next() {
        Some((_, seg)) => self.cur = Some(seg.iter()),
        None => return None,
      }
    }
  }
}
