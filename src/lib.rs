//! blossom-matching - 一般图最大基数匹配
//!
//! 基于 Edmonds 带花树算法的最大匹配库，支持：
//! - 非二分无向图（含多重边）的最大基数匹配
//! - 从贪心匹配或给定匹配出发增广
//! - CSV / JSON Lines 边表导入

pub mod algorithm;
pub mod error;
pub mod graph;
pub mod import;

// 重导出常用类型
pub use algorithm::{max_matching, EdmondsBlossom, Matching, MatchingStats, MaxMatching};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, VertexId};
pub use import::{EdgeListImporter, ImportStats};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
