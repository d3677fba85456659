//! Widened signed arithmetic for exact slope comparisons
//! 用于精确斜率比较的加宽有符号算术
//!
//! Cone slopes are kept as (dx, dy) pairs and compared by cross
//! multiplication, so the comparison never drifts the way naive floating
//! slopes do. Integral keys promote to a signed type at least twice their
//! width; floating keys promote to f64.

use std::{
  cmp::Ordering,
  fmt::Debug,
  ops::{Add, Sub},
};

/// Widened signed numeric used by the cone geometry.
/// 锥形几何使用的加宽有符号数值类型。
pub trait Wide:
  Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Send + Sync + Debug + 'static
{
  /// Lift a rank into the widened domain.
  /// 将名次提升到加宽域。
  fn from_usize(v: usize) -> Self;

  /// Lossy conversion, used once per emitted segment.
  /// 有损转换，每个输出段只用一次。
  fn to_f64(self) -> f64;

  /// Compare dy_a/dx_a against dy_b/dx_b by cross multiplication.
  /// 通过交叉相乘比较 dy_a/dx_a 与 dy_b/dx_b。
  fn cross_cmp(dy_a: Self, dx_a: Self, dy_b: Self, dx_b: Self) -> Ordering;
}

impl Wide for i64 {
  #[inline]
  fn from_usize(v: usize) -> Self {
    v as i64
  }

  #[inline]
  fn to_f64(self) -> f64 {
    self as f64
  }

  #[inline]
  fn cross_cmp(dy_a: Self, dx_a: Self, dy_b: Self, dx_b: Self) -> Ordering {
    // i64 products fit i128 for any operands
    (dy_a as i128 * dx_b as i128).cmp(&(dy_b as i128 * dx_a as i128))
  }
}

impl Wide for i128 {
  #[inline]
  fn from_usize(v: usize) -> Self {
    v as i128
  }

  #[inline]
  fn to_f64(self) -> f64 {
    self as f64
  }

  #[inline]
  fn cross_cmp(dy_a: Self, dx_a: Self, dy_b: Self, dx_b: Self) -> Ordering {
    // Key deltas use at most 65 bits, rank deltas stay far below 63;
    // the products keep headroom inside i128.
    (dy_a * dx_b).cmp(&(dy_b * dx_a))
  }
}

impl Wide for f64 {
  #[inline]
  fn from_usize(v: usize) -> Self {
    v as f64
  }

  #[inline]
  fn to_f64(self) -> f64 {
    self
  }

  #[inline]
  fn cross_cmp(dy_a: Self, dx_a: Self, dy_b: Self, dx_b: Self) -> Ordering {
    (dy_a * dx_b)
      .partial_cmp(&(dy_b * dx_a))
      .unwrap_or(Ordering::Equal)
  }
}
