//! 交错树搜索
//!
//! 一次搜索即一个阶段：从所有未匹配顶点出发同时生长交错森林，
//! 遇到同一棵树内两个偶顶点之间的边时收缩出新的花，遇到两棵不同树的
//! 偶顶点之间的边时找到增广路径。花只通过并查集隐式表示，
//! 奇顶点并入花时记录桥（bridge），重建路径时借助桥"虚拟展开"花。
//!
//! 所有逐顶点状态在每个阶段开始时整体重新初始化。

use super::matching::Matching;
use super::partition::BlossomPartition;
use super::path_list::{Path, PathList};
use crate::graph::{EdgeId, Graph, VertexId};
use std::collections::VecDeque;
use tracing::trace;

/// 顶点在交错森林中的标号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexState {
    /// 尚未到达（已匹配且未进入任何树）
    Unreached,
    /// 偶顶点（树根或经匹配边到达）
    Even,
    /// 奇顶点（经非匹配边到达）
    Odd,
}

/// 奇顶点并入花时记录的桥
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    /// 闭合花的边
    pub edge: EdgeId,
    /// 该边位于此奇顶点一侧的端点
    pub endpoint: VertexId,
}

/// 单个阶段的搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// 找到增广路径
    Augmenting(Path),
    /// 队列耗尽，当前匹配已是最大匹配
    Exhausted,
}

/// 路径重建任务（显式栈，等价于递归形式）
#[derive(Debug, Clone, Copy)]
enum Task {
    /// 计算 path(from, to) 并压入结果
    Build { from: VertexId, to: VertexId },
    /// 压入单边列表
    Edge(EdgeId),
    /// 反转栈顶列表
    Reverse,
    /// 拼接栈顶两个列表
    Join,
}

/// 交错树搜索状态
#[derive(Debug, Clone)]
pub struct AlternatingTreeSearch {
    state: Vec<VertexState>,
    parent_edge: Vec<Option<EdgeId>>,
    bridge: Vec<Option<Bridge>>,
    mark: Vec<bool>,
    partition: BlossomPartition,
    paths: PathList,
    queue: VecDeque<EdgeId>,
    queued: Vec<bool>,
    /// 本阶段收缩出的花的数量
    blossoms: usize,
}

impl AlternatingTreeSearch {
    /// 为图分配搜索状态
    pub fn new(graph: &Graph) -> Self {
        let n = graph.vertex_count();
        let m = graph.edge_count();
        Self {
            state: vec![VertexState::Even; n + 1],
            parent_edge: vec![None; n + 1],
            bridge: vec![None; n + 1],
            mark: vec![false; n + 1],
            partition: BlossomPartition::new(n),
            paths: PathList::new(m),
            queue: VecDeque::with_capacity(m),
            queued: vec![false; m + 1],
            blossoms: 0,
        }
    }

    /// 本阶段形成的花数
    pub fn blossoms(&self) -> usize {
        self.blossoms
    }

    /// 顶点标号
    pub fn state(&self, u: VertexId) -> VertexState {
        self.state[u.index()]
    }

    /// 奇顶点的桥（只有并入花的奇顶点才有）
    pub fn bridge(&self, u: VertexId) -> Option<Bridge> {
        self.bridge[u.index()]
    }

    /// 路径列表，用于读取 [`PhaseOutcome::Augmenting`] 中的路径
    pub fn paths(&self) -> &PathList {
        &self.paths
    }

    /// 路径列表的可变引用（增广时逐条弹出）
    pub fn paths_mut(&mut self) -> &mut PathList {
        &mut self.paths
    }

    /// 运行一个完整阶段
    pub fn run_phase(&mut self, graph: &Graph, matching: &Matching) -> PhaseOutcome {
        self.new_phase(graph, matching);

        while let Some(e) = self.queue.pop_front() {
            self.queued[e.index()] = false;
            if let Some(path) = self.process_edge(graph, matching, e) {
                return PhaseOutcome::Augmenting(path);
            }
        }
        PhaseOutcome::Exhausted
    }

    /// 阶段初始化：未匹配顶点为偶根，其余为未到达
    fn new_phase(&mut self, graph: &Graph, matching: &Matching) {
        let n = graph.vertex_count();
        let m = graph.edge_count();

        self.state.clear();
        self.state.resize(n + 1, VertexState::Even);
        self.parent_edge.clear();
        self.parent_edge.resize(n + 1, None);
        self.bridge.clear();
        self.bridge.resize(n + 1, None);
        self.mark.clear();
        self.mark.resize(n + 1, false);
        self.partition.reset(n);
        self.paths.reset(m);
        self.queue.clear();
        self.queued.clear();
        self.queued.resize(m + 1, false);
        self.blossoms = 0;

        for u in graph.vertices() {
            if matching.matched_edge(u).is_some() {
                self.state[u.index()] = VertexState::Unreached;
            }
        }
        for u in graph.vertices() {
            if self.state[u.index()] == VertexState::Even {
                self.enqueue_incident(graph, u, None);
            }
        }
    }

    /// 处理一条出队的边；找到增广路径时返回该路径
    fn process_edge(&mut self, graph: &Graph, matching: &Matching, e: EdgeId) -> Option<Path> {
        let edge = graph.edge(e)?;
        let (mut v, mut w) = edge.endpoints();
        let mut vb = self.partition.base(v);
        if self.state[vb.index()] != VertexState::Even {
            std::mem::swap(&mut v, &mut w);
            vb = self.partition.base(v);
        }
        assert!(
            self.state[vb.index()] == VertexState::Even,
            "花结构损坏: 边 {} 的两个端点所在花的花底都不是偶顶点",
            e
        );
        let wb = self.partition.base(w);

        if vb == wb {
            return None;
        }

        match self.state[wb.index()] {
            VertexState::Unreached => {
                self.extend_tree(graph, matching, e, w);
                None
            }
            VertexState::Odd => None,
            VertexState::Even => match self.nca(graph, vb, wb) {
                None => Some(self.augmenting_path(graph, e, v, w, vb, wb)),
                Some(base) => {
                    self.form_blossom(graph, e, v, vb, base);
                    self.form_blossom(graph, e, w, wb, base);
                    self.blossoms += 1;
                    trace!(edge = %e, base = %base, "收缩花");
                    None
                }
            },
        }
    }

    /// 树扩展：`w` 成为奇顶点，其配偶成为偶顶点
    fn extend_tree(&mut self, graph: &Graph, matching: &Matching, e: EdgeId, w: VertexId) {
        let Some(me) = matching.matched_edge(w) else {
            panic!("未到达的顶点 {} 没有匹配边", w);
        };
        let x = graph.mate(w, me);

        self.state[w.index()] = VertexState::Odd;
        self.parent_edge[w.index()] = Some(e);
        self.state[x.index()] = VertexState::Even;
        self.parent_edge[x.index()] = Some(me);
        self.enqueue_incident(graph, x, Some(me));
    }

    /// 沿 `v` 一侧从花底 `from` 向上走到 `base`，把途经的花并入新花
    fn form_blossom(
        &mut self,
        graph: &Graph,
        e: EdgeId,
        v: VertexId,
        from: VertexId,
        base: VertexId,
    ) {
        let mut x = from;
        while x != base {
            self.partition.absorb(x, base);

            let y = graph.mate(x, self.parent(x));
            self.partition.absorb(y, base);
            self.bridge[y.index()] = Some(Bridge {
                edge: e,
                endpoint: v,
            });
            // 奇顶点并入花后相当于偶顶点，其关联边需要重新检查
            self.enqueue_incident(graph, y, None);

            let up = graph.mate(y, self.parent(y));
            x = self.partition.base(up);
        }
    }

    /// 收缩森林中 `u`、`v` 的最近公共祖先（花底）；不在同一棵树时返回 None
    fn nca(&mut self, graph: &Graph, u: VertexId, v: VertexId) -> Option<VertexId> {
        let mut touched = Vec::new();
        let mut x = Some(u);
        let mut y = Some(v);
        let mut result = None;

        while x.is_some() || y.is_some() {
            if let Some(a) = x {
                if self.mark[a.index()] {
                    result = Some(a);
                    break;
                }
                self.mark[a.index()] = true;
                touched.push(a);
                x = self.parent_base(graph, a);
            }
            if let Some(b) = y {
                if self.mark[b.index()] {
                    result = Some(b);
                    break;
                }
                self.mark[b.index()] = true;
                touched.push(b);
                y = self.parent_base(graph, b);
            }
        }

        for t in touched {
            self.mark[t.index()] = false;
        }
        result
    }

    /// 收缩森林中花底 `x` 的上一级花底（跨过匹配边和树边），树根返回 None
    fn parent_base(&mut self, graph: &Graph, x: VertexId) -> Option<VertexId> {
        let me = self.parent_edge[x.index()]?;
        let y = graph.mate(x, me);
        let up = graph.mate(y, self.parent(y));
        Some(self.partition.base(up))
    }

    /// 沿收缩森林走到树根
    fn root(&mut self, graph: &Graph, mut x: VertexId) -> VertexId {
        while let Some(up) = self.parent_base(graph, x) {
            x = up;
        }
        x
    }

    /// 组装增广路径：reverse(path(v, 根)) + e + path(w, 根)
    fn augmenting_path(
        &mut self,
        graph: &Graph,
        e: EdgeId,
        v: VertexId,
        w: VertexId,
        vb: VertexId,
        wb: VertexId,
    ) -> Path {
        let vroot = self.root(graph, vb);
        let wroot = self.root(graph, wb);

        let left = self.path(graph, v, vroot);
        let left = self.paths.reverse(left);
        let middle = Some(self.paths.singleton(e));
        let left = self.paths.join(left, middle);
        let right = self.path(graph, w, wroot);
        self.paths.join(left, right)
    }

    /// 从 `a` 到其祖先 `b` 的路径
    ///
    /// - `a == b`：空
    /// - `a` 为偶顶点：先走匹配边到父亲，再走父亲的树边，然后继续向上
    /// - `a` 为奇顶点（必在花内）：reverse(path(v, a)) + e + path(mate(v, e), b)，
    ///   其中 (e, v) 是 `a` 的桥
    pub fn path(&mut self, graph: &Graph, a: VertexId, b: VertexId) -> Path {
        let mut tasks = vec![Task::Build { from: a, to: b }];
        let mut values: Vec<Path> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Build { from, to } => {
                    if from == to {
                        values.push(None);
                    } else if self.state[from.index()] == VertexState::Even {
                        let e1 = self.parent(from);
                        let p1 = graph.mate(from, e1);
                        if p1 == to {
                            tasks.push(Task::Edge(e1));
                        } else {
                            let e2 = self.parent(p1);
                            let p2 = graph.mate(p1, e2);
                            tasks.extend([
                                Task::Join,
                                Task::Build { from: p2, to },
                                Task::Join,
                                Task::Edge(e2),
                                Task::Edge(e1),
                            ]);
                        }
                    } else {
                        let Some(br) = self.bridge[from.index()] else {
                            panic!("奇顶点 {} 不在任何花内却需要经过它重建路径", from);
                        };
                        let across = graph.mate(br.endpoint, br.edge);
                        tasks.extend([
                            Task::Join,
                            Task::Build { from: across, to },
                            Task::Join,
                            Task::Edge(br.edge),
                            Task::Reverse,
                            Task::Build {
                                from: br.endpoint,
                                to: from,
                            },
                        ]);
                    }
                }
                Task::Edge(e) => values.push(Some(self.paths.singleton(e))),
                Task::Reverse => {
                    let top = values.pop().flatten();
                    values.push(self.paths.reverse(top));
                }
                Task::Join => {
                    let right = values.pop().flatten();
                    let left = values.pop().flatten();
                    values.push(self.paths.join(left, right));
                }
            }
        }

        debug_assert_eq!(values.len(), 1);
        values.pop().flatten()
    }

    /// 顶点的父边；非树根必定存在
    fn parent(&self, x: VertexId) -> EdgeId {
        match self.parent_edge[x.index()] {
            Some(e) => e,
            None => panic!("花结构损坏: 顶点 {} 没有父边", x),
        }
    }

    fn enqueue_incident(&mut self, graph: &Graph, u: VertexId, skip: Option<EdgeId>) {
        for &e in graph.incident_edges(u) {
            if Some(e) != skip && !self.queued[e.index()] {
                self.queued[e.index()] = true;
                self.queue.push_back(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    fn e(id: u32) -> EdgeId {
        EdgeId::new(id)
    }

    /// 花形图：根 1 - 2=3，花 3-4=5-6=7-3，另一棵树 9-8=10，边 10-4
    fn flower() -> (Graph, Matching) {
        let graph = Graph::from_edges(
            10,
            &[
                (2, 3),
                (4, 5),
                (6, 7),
                (8, 10),
                (1, 2),
                (3, 4),
                (5, 6),
                (7, 3),
                (9, 8),
                (10, 4),
            ],
        )
        .unwrap();
        let matching = Matching::greedy(&graph);
        (graph, matching)
    }

    #[test]
    fn test_phase_labels_tree() {
        // 路径 1-2=3-4，只有两个端点未匹配
        let graph = Graph::from_edges(4, &[(2, 3), (1, 2), (3, 4)]).unwrap();
        let matching = Matching::greedy(&graph);
        let mut search = AlternatingTreeSearch::new(&graph);

        match search.run_phase(&graph, &matching) {
            PhaseOutcome::Augmenting(path) => {
                let edges: Vec<_> = search.paths().iter(path).collect();
                assert_eq!(edges.len(), 3);
            }
            PhaseOutcome::Exhausted => panic!("应当找到增广路径"),
        }
        assert_eq!(search.state(v(1)), VertexState::Even);
        assert_eq!(search.state(v(2)), VertexState::Odd);
        assert_eq!(search.state(v(3)), VertexState::Even);
        assert_eq!(search.blossoms(), 0);
    }

    #[test]
    fn test_flower_path_goes_through_blossom() {
        let (graph, matching) = flower();
        assert_eq!(matching.len(), 4);

        let mut search = AlternatingTreeSearch::new(&graph);
        let outcome = search.run_phase(&graph, &matching);
        let PhaseOutcome::Augmenting(path) = outcome else {
            panic!("应当找到增广路径");
        };

        assert_eq!(search.blossoms(), 1);
        // 奇顶点 4 和 7 并入了花底为 3 的花
        assert_eq!(
            search.bridge(v(4)),
            Some(Bridge {
                edge: e(7),
                endpoint: v(5)
            })
        );
        assert_eq!(
            search.bridge(v(7)),
            Some(Bridge {
                edge: e(7),
                endpoint: v(6)
            })
        );

        let edges: Vec<u32> = search.paths().iter(path).map(|x| x.as_u32()).collect();
        assert_eq!(edges, vec![9, 4, 10, 2, 7, 3, 8, 1, 5]);
    }

    #[test]
    fn test_five_cycle_forms_blossom_without_path() {
        let graph = Graph::from_edges(5, &[(1, 2), (2, 3), (3, 4), (4, 5), (5, 1)]).unwrap();
        let matching = Matching::greedy(&graph);
        let mut search = AlternatingTreeSearch::new(&graph);

        assert_eq!(search.run_phase(&graph, &matching), PhaseOutcome::Exhausted);
        assert_eq!(search.blossoms(), 1);
    }

    #[test]
    fn test_phase_state_is_reinitialized() {
        let (graph, matching) = flower();
        let mut search = AlternatingTreeSearch::new(&graph);
        let _ = search.run_phase(&graph, &matching);

        // 换一个完美匹配再跑：不应残留上一阶段的花和桥
        let perfect = Matching::from_edges(
            &graph,
            &[e(5), e(8), e(7), e(10), e(9)],
        )
        .unwrap();
        assert_eq!(search.run_phase(&graph, &perfect), PhaseOutcome::Exhausted);
        assert_eq!(search.blossoms(), 0);
        assert_eq!(search.bridge(v(4)), None);
        for u in graph.vertices() {
            assert_eq!(search.state(u), VertexState::Unreached);
        }
    }

    #[test]
    fn test_empty_graph_phase() {
        let graph = Graph::new(0);
        let matching = Matching::empty(&graph);
        let mut search = AlternatingTreeSearch::new(&graph);
        assert_eq!(search.run_phase(&graph, &matching), PhaseOutcome::Exhausted);
    }
}
