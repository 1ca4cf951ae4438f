//! 顶点定义
//!
//! 顶点编号从 1 开始连续分配，0 不是合法编号

use serde::{Deserialize, Serialize};
use std::fmt;

/// 顶点 ID（取值 1..=n）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// 作为数组下标使用（数组长度为 n + 1）
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
