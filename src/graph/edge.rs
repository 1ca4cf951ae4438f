//! 边定义
//!
//! 无向边，两个端点分别记为 left / right（按插入时的顺序）

use crate::graph::vertex::VertexId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（取值 1..=m）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for EdgeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 第一个端点
    left: VertexId,
    /// 第二个端点
    right: VertexId,
}

impl Edge {
    /// 创建新边
    pub fn new(id: EdgeId, left: VertexId, right: VertexId) -> Self {
        Self { id, left, right }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn left(&self) -> VertexId {
        self.left
    }

    pub fn right(&self) -> VertexId {
        self.right
    }

    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.left, self.right)
    }

    /// 是否以 `v` 为端点
    pub fn is_incident(&self, v: VertexId) -> bool {
        self.left == v || self.right == v
    }

    /// 另一个端点
    ///
    /// `x` 必须是本边的端点之一
    pub fn mate(&self, x: VertexId) -> VertexId {
        debug_assert!(self.is_incident(x), "顶点 {} 不是边 {} 的端点", x, self.id);
        if x == self.left {
            self.right
        } else {
            self.left
        }
    }
}
