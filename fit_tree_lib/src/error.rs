use thiserror::Error;

/// Index specialized Result type.
/// 索引专用的 Result 类型。
pub type Result<T> = std::result::Result<T, Error>;

/// Construction errors. All query and update operations are total;
/// only the build parameters can be rejected.
/// 构建错误。查询和更新操作都是全函数，只有构建参数会被拒绝。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// The error bound must be positive.
  /// 误差界必须为正。
  #[error("epsilon must be greater than zero")]
  ZeroEpsilon,
  /// The per-segment buffer capacity must satisfy 0 < buffer < epsilon.
  /// 每段缓冲区容量必须满足 0 < buffer < epsilon。
  #[error("buffer capacity {buffer} must be in 1..epsilon ({epsilon})")]
  BadBuffer { buffer: usize, epsilon: usize },
}
