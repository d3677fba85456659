//! Type definitions for the FITing-Tree
//! FITing-Tree 类型定义

#![allow(clippy::cast_precision_loss)]

use std::fmt::Debug;

use fit_tree_lib::Wide;

/// Key trait for supported types
/// 支持的键类型约束
pub trait Key: Copy + Send + Sync + PartialOrd + Debug + 'static {
  /// Widened signed type for exact cone arithmetic
  /// 用于精确锥形算术的加宽有符号类型
  type Wide: Wide;

  /// Convert to the widened type
  /// 转换为加宽类型
  fn as_wide(self) -> Self::Wide;

  /// Convert to f64
  /// 转换为 f64
  fn as_f64(self) -> f64;
}

macro_rules! impl_key {
  ($wide:ty: $($t:ty),*) => {
    $(
      impl Key for $t {
        type Wide = $wide;

        #[inline(always)]
        fn as_wide(self) -> $wide {
          self as $wide
        }

        #[inline(always)]
        fn as_f64(self) -> f64 {
          self as f64
        }
      }
    )*
  };
}

// Promotion: <= 4 byte integers widen to i64, 8 byte to i128,
// floats to f64. 16 byte keys have no wider signed type and stay out.
impl_key!(i64: u8, i8, u16, i16, u32, i32);
impl_key!(i128: u64, i64, usize, isize);

impl Key for f32 {
  type Wide = f64;

  #[inline(always)]
  fn as_wide(self) -> f64 {
    self as f64
  }

  #[inline(always)]
  fn as_f64(self) -> f64 {
    self as f64
  }
}

impl Key for f64 {
  type Wide = f64;

  #[inline(always)]
  fn as_wide(self) -> f64 {
    self
  }

  #[inline(always)]
  fn as_f64(self) -> f64 {
    self
  }
}

/// Position payload for the buffered tree
/// 缓冲树的位置负载类型
pub trait Pos: Copy + Send + Sync + Ord + Debug + 'static {
  fn from_usize(v: usize) -> Self;
  fn as_usize(self) -> usize;
}

macro_rules! impl_pos {
  ($($t:ty),*) => {
    $(
      impl Pos for $t {
        #[inline(always)]
        fn from_usize(v: usize) -> Self {
          v as $t
        }

        #[inline(always)]
        fn as_usize(self) -> usize {
          self as usize
        }
      }
    )*
  };
}

impl_pos!(u16, u32, u64, usize);

/// Linear segment: pos = (key - start_key) * slope + start_pos
/// 线性段：pos = (key - start_key) * slope + start_pos
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
#[derive(Clone, Copy, Debug)]
pub struct Segment<K: Key> {
  /// Smallest key assigned to this segment
  /// 本段最小键
  pub start_key: K,
  /// Rank of the smallest key
  /// 最小键的名次
  pub start_pos: usize,
  /// Largest key assigned to this segment
  /// 本段最大键
  pub end_key: K,
  pub slope: f64,
}

impl<K: Key> Segment<K> {
  /// Predicted rank of `key`, truncated toward zero
  /// 预测键的名次，向零截断
  #[inline]
  #[must_use]
  pub fn predict(&self, key: K) -> usize {
    let dx = (key.as_wide() - self.start_key.as_wide()).to_f64();
    let pos = self.slope.mul_add(dx, self.start_pos as f64);
    if pos <= 0.0 { 0 } else { pos as usize }
  }

  /// Predicted offset from the segment start, truncated toward zero
  /// 预测相对段起点的偏移，向零截断
  #[inline]
  #[must_use]
  pub fn predict_offset(&self, key: K) -> usize {
    let dx = (key.as_wide() - self.start_key.as_wide()).to_f64();
    let off = self.slope * dx;
    if off <= 0.0 { 0 } else { off as usize }
  }
}

/// Result of an approximate position query: `pos` inside the window
/// `[lo, hi)`, within which a classical sorted search locates the key.
/// 近似位置查询结果：`pos` 落在窗口 `[lo, hi)` 内，
/// 在该窗口中用经典有序查找即可定位键。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApproxPos {
  pub pos: usize,
  pub lo: usize,
  pub hi: usize,
}

/// Index statistics
/// 索引统计信息
#[cfg_attr(feature = "bitcode", derive(bitcode::Encode, bitcode::Decode))]
#[derive(Clone, Debug, Default)]
pub struct FitStats {
  pub segments: usize,
  pub avg_segment_size: f64,
  pub memory_bytes: usize,
}
