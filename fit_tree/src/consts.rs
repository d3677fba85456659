//! Constants for the FITing-Tree
//! FITing-Tree 常量

pub const DEFAULT_EPSILON: usize = 64;
pub const DEFAULT_BUFFER: usize = 32;
