//! 邻接索引
//!
//! 每个顶点的关联边列表

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;

/// 边索引
#[derive(Debug, Clone)]
pub struct EdgeIndex {
    /// 顶点到关联边的映射（按插入顺序，下标 0 不使用）
    incident: Vec<Vec<EdgeId>>,
}

impl EdgeIndex {
    /// 创建新索引
    pub fn new(vertex_count: usize) -> Self {
        Self {
            incident: vec![Vec::new(); vertex_count + 1],
        }
    }

    /// 为新顶点预留位置
    pub fn add_vertex(&mut self) {
        self.incident.push(Vec::new());
    }

    /// 添加边索引
    pub fn add_edge(&mut self, edge_id: EdgeId, u: VertexId, v: VertexId) {
        self.incident[u.index()].push(edge_id);
        self.incident[v.index()].push(edge_id);
    }

    /// 获取顶点的关联边
    pub fn incident(&self, vertex_id: VertexId) -> &[EdgeId] {
        self.incident
            .get(vertex_id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 获取顶点的度数
    pub fn degree(&self, vertex_id: VertexId) -> usize {
        self.incident(vertex_id).len()
    }
}

impl Default for EdgeIndex {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_index() {
        let mut index = EdgeIndex::new(3);
        let a = VertexId::new(1);
        let b = VertexId::new(2);
        let c = VertexId::new(3);

        index.add_edge(EdgeId::new(1), a, b);
        index.add_edge(EdgeId::new(2), c, a);
        index.add_edge(EdgeId::new(3), b, a);

        assert_eq!(
            index.incident(a),
            &[EdgeId::new(1), EdgeId::new(2), EdgeId::new(3)]
        );
        assert_eq!(index.degree(c), 1);
        assert_eq!(index.incident(b), &[EdgeId::new(1), EdgeId::new(3)]);
        assert!(index.incident(VertexId::new(9)).is_empty());
    }

    #[test]
    fn test_add_vertex_extends_index() {
        let mut index = EdgeIndex::new(1);
        index.add_vertex();
        index.add_edge(EdgeId::new(1), VertexId::new(1), VertexId::new(2));
        assert_eq!(index.degree(VertexId::new(2)), 1);
    }
}
