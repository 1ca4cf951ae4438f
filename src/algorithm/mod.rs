//! 图算法模块
//!
//! 一般图最大基数匹配（Edmonds 带花树算法）及其组成部分

mod matching;
mod partition;
mod path_list;
mod search;

pub use matching::{max_matching, EdmondsBlossom, Matching, MatchingStats, MaxMatching};
pub use partition::BlossomPartition;
pub use path_list::{Path, PathHandle, PathIter, PathList};
pub use search::{AlternatingTreeSearch, Bridge, PhaseOutcome, VertexState};
