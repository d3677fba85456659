//! Rational cone geometry: slopes as (dx, dy) pairs
//! 有理锥形几何：以 (dx, dy) 对表示斜率

use std::{cmp::Ordering, ops::Sub};

use fit_tree_lib::Wide;

use crate::types::Key;

/// A slope kept as a widened (dx, dy) pair. Comparisons cross-multiply
/// instead of dividing, so the cone never collapses from rounding.
/// 以加宽 (dx, dy) 对保存的斜率。比较用交叉相乘而不是除法，
/// 锥体不会因舍入而塌缩。
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slope<W: Wide> {
  pub dx: W,
  pub dy: W,
}

impl<W: Wide> Slope<W> {
  /// Flat sentinel: dy/dx = 0/1
  /// 平坦哨兵：dy/dx = 0/1
  #[inline]
  pub fn flat() -> Self {
    Self {
      dx: W::from_usize(1),
      dy: W::from_usize(0),
    }
  }

  /// Vertical sentinel: dy/dx = 1/0
  /// 垂直哨兵：dy/dx = 1/0
  #[inline]
  pub fn vertical() -> Self {
    Self {
      dx: W::from_usize(0),
      dy: W::from_usize(1),
    }
  }

  #[inline]
  pub fn ordering(self, rhs: Self) -> Ordering {
    W::cross_cmp(self.dy, self.dx, rhs.dy, rhs.dx)
  }

  #[inline]
  pub fn lt(self, rhs: Self) -> bool {
    self.ordering(rhs) == Ordering::Less
  }

  #[inline]
  pub fn gt(self, rhs: Self) -> bool {
    self.ordering(rhs) == Ordering::Greater
  }

  /// Scalar slope, used once when a segment is emitted
  /// 标量斜率，只在输出段时使用一次
  #[inline]
  pub fn to_f64(self) -> f64 {
    self.dy.to_f64() / self.dx.to_f64()
  }
}

/// A point on the key-rank plane, rank already widened.
/// 键-名次平面上的一个点，名次已加宽。
#[derive(Clone, Copy, Debug)]
pub(crate) struct Point<K: Key> {
  pub x: K,
  pub y: <K as Key>::Wide,
}

impl<K: Key> Point<K> {
  #[inline]
  pub fn new(x: K, y: <K as Key>::Wide) -> Self {
    Self { x, y }
  }
}

impl<K: Key> Sub for Point<K> {
  type Output = Slope<<K as Key>::Wide>;

  #[inline]
  fn sub(self, rhs: Self) -> Self::Output {
    Slope {
      dx: self.x.as_wide() - rhs.x.as_wide(),
      dy: self.y - rhs.y,
    }
  }
}
