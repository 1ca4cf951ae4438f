//! 图数据结构
//!
//! 内存中的无向多重图，顶点 1..=n，边 1..=m

use super::edge::{Edge, EdgeId};
use super::index::EdgeIndex;
use super::vertex::VertexId;
use crate::error::{Error, Result};

/// 无向图
#[derive(Debug, Clone)]
pub struct Graph {
    /// 顶点数量
    vertex_count: usize,
    /// 边表（按 ID 顺序，edges[i] 的 ID 为 i + 1）
    edges: Vec<Edge>,
    /// 邻接索引
    edge_index: EdgeIndex,
}

impl Graph {
    /// 创建含 `n` 个孤立顶点的图
    pub fn new(n: usize) -> Self {
        Self {
            vertex_count: n,
            edges: Vec::new(),
            edge_index: EdgeIndex::new(n),
        }
    }

    /// 由顶点对列表构建图
    pub fn from_edges(n: usize, pairs: &[(u32, u32)]) -> Result<Self> {
        let mut graph = Self::new(n);
        for &(u, v) in pairs {
            graph.add_edge(VertexId::new(u), VertexId::new(v))?;
        }
        Ok(graph)
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点
    pub fn add_vertex(&mut self) -> VertexId {
        self.vertex_count += 1;
        self.edge_index.add_vertex();
        VertexId::new(self.vertex_count as u32)
    }

    /// 顶点是否存在
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        id.index() >= 1 && id.index() <= self.vertex_count
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// 遍历所有顶点
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (1..=self.vertex_count as u32).map(VertexId::new)
    }

    // ==================== 边操作 ====================

    /// 添加边
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> Result<EdgeId> {
        // 验证顶点存在
        if !self.contains_vertex(u) {
            return Err(Error::VertexNotFound(u));
        }
        if !self.contains_vertex(v) {
            return Err(Error::VertexNotFound(v));
        }
        if u == v {
            return Err(Error::SelfLoop(u));
        }

        let id = EdgeId::new(self.edges.len() as u32 + 1);
        self.edges.push(Edge::new(id, u, v));
        self.edge_index.add_edge(id, u, v);

        Ok(id)
    }

    /// 获取边
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        id.index().checked_sub(1).and_then(|i| self.edges.get(i))
    }

    /// 获取边，不存在时返回错误
    pub fn get_edge(&self, id: EdgeId) -> Result<&Edge> {
        self.edge(id).ok_or(Error::EdgeNotFound(id))
    }

    /// 遍历所有边
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ==================== 邻居查询 ====================

    /// 获取顶点的关联边（插入顺序）
    pub fn incident_edges(&self, vertex_id: VertexId) -> &[EdgeId] {
        self.edge_index.incident(vertex_id)
    }

    /// 获取顶点的邻居
    pub fn neighbors(&self, vertex_id: VertexId) -> Vec<VertexId> {
        self.incident_edges(vertex_id)
            .iter()
            .map(|&e| self.mate(vertex_id, e))
            .collect()
    }

    /// 获取顶点的度数
    pub fn degree(&self, vertex_id: VertexId) -> usize {
        self.edge_index.degree(vertex_id)
    }

    /// 边 `e` 上 `u` 的另一个端点
    ///
    /// 调用方保证 `e` 存在且与 `u` 关联
    pub fn mate(&self, u: VertexId, e: EdgeId) -> VertexId {
        self.edges[e.index() - 1].mate(u)
    }

    /// 边 `e` 的两个端点
    ///
    /// 调用方保证 `e` 存在
    pub fn endpoints(&self, e: EdgeId) -> (VertexId, VertexId) {
        self.edges[e.index() - 1].endpoints()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_basic() {
        let mut graph = Graph::new(3);
        let v1 = VertexId::new(1);
        let v2 = VertexId::new(2);
        let v3 = VertexId::new(3);

        let e1 = graph.add_edge(v1, v2).unwrap();
        let e2 = graph.add_edge(v2, v3).unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(e1, EdgeId::new(1));
        assert_eq!(graph.mate(v2, e1), v1);
        assert_eq!(graph.mate(v2, e2), v3);
        assert_eq!(graph.incident_edges(v2), &[e1, e2]);
        assert_eq!(graph.neighbors(v2), vec![v1, v3]);
        assert_eq!(graph.edge(e2).map(|e| e.endpoints()), Some((v2, v3)));
        assert!(graph.edge(EdgeId::new(0)).is_none());
        assert!(graph.edge(EdgeId::new(3)).is_none());
    }

    #[test]
    fn test_graph_rejects_bad_edges() {
        let mut graph = Graph::new(2);
        assert!(matches!(
            graph.add_edge(VertexId::new(1), VertexId::new(3)),
            Err(Error::VertexNotFound(v)) if v == VertexId::new(3)
        ));
        assert!(matches!(
            graph.add_edge(VertexId::new(0), VertexId::new(1)),
            Err(Error::VertexNotFound(_))
        ));
        assert!(matches!(
            graph.add_edge(VertexId::new(2), VertexId::new(2)),
            Err(Error::SelfLoop(_))
        ));
        assert!(matches!(
            graph.get_edge(EdgeId::new(1)),
            Err(Error::EdgeNotFound(_))
        ));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_graph_add_vertex_and_parallel_edges() {
        let mut graph = Graph::from_edges(2, &[(1, 2), (2, 1)]).unwrap();
        let v3 = graph.add_vertex();
        assert_eq!(v3, VertexId::new(3));
        graph.add_edge(v3, VertexId::new(1)).unwrap();

        assert_eq!(graph.degree(VertexId::new(1)), 3);
        assert_eq!(
            graph.neighbors(VertexId::new(1)),
            vec![VertexId::new(2), VertexId::new(2), v3]
        );
        assert_eq!(graph.vertices().collect::<Vec<_>>().len(), 3);
    }
}
