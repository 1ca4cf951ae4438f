//! 一般图最大基数匹配
//!
//! Edmonds 带花树算法：贪心构造初始匹配，然后反复运行交错树搜索，
//! 每找到一条增广路径就沿路径翻转匹配，直到不存在增广路径为止
//! （Berge 定理保证此时匹配最大）。

use super::path_list::{Path, PathList};
use super::search::{AlternatingTreeSearch, PhaseOutcome};
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// 匹配：每个顶点至多关联一条匹配边
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    /// 顶点到其匹配边的映射（下标 0 不使用）
    match_edge: Vec<Option<EdgeId>>,
}

impl Matching {
    /// 空匹配
    pub fn empty(graph: &Graph) -> Self {
        Self {
            match_edge: vec![None; graph.vertex_count() + 1],
        }
    }

    /// 按边的插入顺序贪心构造：两个端点都未匹配时选取该边
    pub fn greedy(graph: &Graph) -> Self {
        let mut matching = Self::empty(graph);
        for edge in graph.edges() {
            let (u, v) = edge.endpoints();
            if matching.is_exposed(u) && matching.is_exposed(v) {
                matching.set(u, v, Some(edge.id()));
            }
        }
        matching
    }

    /// 由边集合构造，边必须存在且两两不相交
    pub fn from_edges(graph: &Graph, edges: &[EdgeId]) -> Result<Self> {
        let mut matching = Self::empty(graph);
        for &e in edges {
            let (u, v) = graph.get_edge(e)?.endpoints();
            for x in [u, v] {
                if let Some(other) = matching.matched_edge(x) {
                    return Err(Error::InvalidMatching(format!(
                        "顶点 {} 同时关联匹配边 {} 和 {}",
                        x, other, e
                    )));
                }
            }
            matching.set(u, v, Some(e));
        }
        Ok(matching)
    }

    /// 顶点的匹配边
    pub fn matched_edge(&self, u: VertexId) -> Option<EdgeId> {
        self.match_edge.get(u.index()).copied().flatten()
    }

    /// 顶点的配偶
    pub fn mate_of(&self, graph: &Graph, u: VertexId) -> Option<VertexId> {
        self.matched_edge(u).map(|e| graph.mate(u, e))
    }

    /// 顶点是否未被匹配覆盖
    pub fn is_exposed(&self, u: VertexId) -> bool {
        self.matched_edge(u).is_none()
    }

    /// 匹配边数
    pub fn len(&self) -> usize {
        self.match_edge.iter().filter(|e| e.is_some()).count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 匹配边集合（按边 ID 升序）
    pub fn edges(&self) -> Vec<EdgeId> {
        let mut edges: Vec<EdgeId> = self.match_edge.iter().flatten().copied().collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// 匹配的顶点对（按边 ID 升序）
    pub fn pairs(&self, graph: &Graph) -> Vec<(VertexId, VertexId)> {
        self.edges()
            .into_iter()
            .filter_map(|e| graph.edge(e).map(|edge| edge.endpoints()))
            .collect()
    }

    /// 校验匹配与图一致：匹配边关联本顶点，且两个端点互相指向同一条边
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        if self.match_edge.len() != graph.vertex_count() + 1 {
            return Err(Error::InvalidMatching(format!(
                "匹配覆盖 {} 个顶点, 图有 {} 个顶点",
                self.match_edge.len().saturating_sub(1),
                graph.vertex_count()
            )));
        }
        for u in graph.vertices() {
            let Some(e) = self.matched_edge(u) else {
                continue;
            };
            let edge = graph.get_edge(e)?;
            if !edge.is_incident(u) {
                return Err(Error::InvalidMatching(format!(
                    "顶点 {} 的匹配边 {} 不与其关联",
                    u, e
                )));
            }
            let w = edge.mate(u);
            if self.matched_edge(w) != Some(e) {
                return Err(Error::InvalidMatching(format!(
                    "边 {} 只在顶点 {} 一侧登记",
                    e, u
                )));
            }
        }
        Ok(())
    }

    /// 沿增广路径翻转，边从 `paths` 中逐条弹出；返回路径长度
    ///
    /// 路径必须是两端未匹配、非匹配边与匹配边交替的简单路径，因此第
    /// 1、3、5… 条边加入匹配后恰好覆盖路径上每个顶点一次，原有的匹配边
    /// 两端都被改写，无需单独移除
    pub(crate) fn augment(&mut self, graph: &Graph, paths: &mut PathList, path: Path) -> usize {
        let mut rest = path;
        let mut len = 0;
        while let Some(handle) = rest {
            let (e, next) = paths.pop(handle);
            let (u, v) = graph.endpoints(e);
            if len % 2 == 0 {
                debug_assert!(
                    self.matched_edge(u) != Some(e) && self.matched_edge(v) != Some(e),
                    "边 {} 应为非匹配边",
                    e
                );
                self.set(u, v, Some(e));
            } else {
                debug_assert!(
                    self.matched_edge(u) == Some(e) || self.matched_edge(v) == Some(e),
                    "边 {} 应为匹配边",
                    e
                );
            }
            len += 1;
            rest = next;
        }
        debug_assert!(len % 2 == 1, "增广路径长度必须为奇数");
        len
    }

    fn set(&mut self, u: VertexId, v: VertexId, e: Option<EdgeId>) {
        self.match_edge[u.index()] = e;
        self.match_edge[v.index()] = e;
    }
}

/// 运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingStats {
    /// 初始匹配大小
    pub initial_size: usize,
    /// 搜索阶段数（包括最后一次无结果的阶段）
    pub phases: usize,
    /// 增广次数
    pub augmentations: usize,
    /// 收缩的花总数
    pub blossoms: usize,
    /// 耗时（毫秒）
    pub duration_ms: u64,
}

/// 最大匹配结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxMatching {
    /// 匹配边数
    pub size: usize,
    /// 匹配
    pub matching: Matching,
    /// 运行统计
    pub stats: MatchingStats,
}

impl MaxMatching {
    /// 匹配的顶点对
    pub fn pairs(&self, graph: &Graph) -> Vec<(VertexId, VertexId)> {
        self.matching.pairs(graph)
    }

    /// 输出 JSON 报告：大小、顶点对、运行统计
    pub fn to_json(&self, graph: &Graph) -> Result<String> {
        let report = serde_json::json!({
            "size": self.size,
            "pairs": self.pairs(graph),
            "stats": self.stats,
        });
        serde_json::to_string_pretty(&report)
            .map_err(|e| Error::SerializationError(e.to_string()))
    }
}

/// Edmonds 带花树最大匹配算法
pub struct EdmondsBlossom {
    graph: Arc<Graph>,
    greedy_init: bool,
    initial: Option<Matching>,
}

impl EdmondsBlossom {
    /// 创建算法实例
    pub fn new(graph: Arc<Graph>) -> Self {
        Self {
            graph,
            greedy_init: true,
            initial: None,
        }
    }

    /// 是否用贪心匹配作为起点（默认是）
    pub fn with_greedy_init(mut self, enabled: bool) -> Self {
        self.greedy_init = enabled;
        self
    }

    /// 从给定匹配出发继续增广
    pub fn with_initial_matching(mut self, matching: Matching) -> Result<Self> {
        matching.validate(&self.graph)?;
        self.initial = Some(matching);
        Ok(self)
    }

    /// 计算最大匹配
    pub fn max_matching(&self) -> MaxMatching {
        let start = Instant::now();
        let graph = self.graph.as_ref();

        let mut matching = match &self.initial {
            Some(m) => m.clone(),
            None if self.greedy_init => Matching::greedy(graph),
            None => Matching::empty(graph),
        };
        let mut stats = MatchingStats {
            initial_size: matching.len(),
            ..Default::default()
        };
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            initial = stats.initial_size,
            "开始计算最大匹配"
        );

        let mut search = AlternatingTreeSearch::new(graph);
        loop {
            stats.phases += 1;
            let outcome = search.run_phase(graph, &matching);
            stats.blossoms += search.blossoms();

            let PhaseOutcome::Augmenting(path) = outcome else {
                break;
            };
            let length = matching.augment(graph, search.paths_mut(), path);
            stats.augmentations += 1;
            debug!(
                phase = stats.phases,
                length,
                blossoms = search.blossoms(),
                "增广完成"
            );
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        let size = matching.len();
        info!(
            size,
            phases = stats.phases,
            blossoms = stats.blossoms,
            "最大匹配计算完成"
        );

        MaxMatching {
            size,
            matching,
            stats,
        }
    }

    /// 检查匹配是否已是最大：再运行一个阶段，找不到增广路径即为最大
    pub fn is_maximum(&self, matching: &Matching) -> Result<bool> {
        matching.validate(&self.graph)?;
        let mut search = AlternatingTreeSearch::new(&self.graph);
        Ok(search.run_phase(&self.graph, matching) == PhaseOutcome::Exhausted)
    }
}

/// 便捷函数：用默认配置计算最大匹配
pub fn max_matching(graph: Arc<Graph>) -> MaxMatching {
    EdmondsBlossom::new(graph).max_matching()
}
