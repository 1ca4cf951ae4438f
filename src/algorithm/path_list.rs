//! 可反转路径列表
//!
//! 以边 ID 为节点的双向链表集合，节点存放在按边编号索引的数组中。
//! 节点的两个邻接槽不区分前后，遍历时由"来的方向"决定下一个节点，
//! 因此列表句柄只需记录首尾，反转即交换首尾，拼接只改两个端点的槽位，
//! 都是 O(1)。同一条边同一时刻只能属于一个列表。

use crate::graph::EdgeId;

/// 非空列表的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathHandle {
    head: EdgeId,
    tail: EdgeId,
}

impl PathHandle {
    /// 第一条边
    pub fn first(&self) -> EdgeId {
        self.head
    }

    /// 最后一条边
    pub fn last(&self) -> EdgeId {
        self.tail
    }
}

/// 可能为空的列表
pub type Path = Option<PathHandle>;

/// 路径列表集合
#[derive(Debug, Clone, Default)]
pub struct PathList {
    /// 每个节点的两个邻接槽（下标 0 不使用）
    links: Vec<[Option<EdgeId>; 2]>,
    /// 节点当前是否属于某个列表
    live: Vec<bool>,
}

impl PathList {
    /// 为 `m` 条边创建节点
    pub fn new(edge_count: usize) -> Self {
        let mut list = Self::default();
        list.reset(edge_count);
        list
    }

    /// 释放全部节点
    pub fn reset(&mut self, edge_count: usize) {
        self.links.clear();
        self.links.resize(edge_count + 1, [None, None]);
        self.live.clear();
        self.live.resize(edge_count + 1, false);
    }

    /// 单元素列表
    pub fn singleton(&mut self, e: EdgeId) -> PathHandle {
        debug_assert!(!self.live[e.index()], "边 {} 已在另一个列表中", e);
        self.live[e.index()] = true;
        self.links[e.index()] = [None, None];
        PathHandle { head: e, tail: e }
    }

    /// 拼接两个列表，`a` 在前；之后不得再使用原句柄
    pub fn join(&mut self, a: Path, b: Path) -> Path {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => {
                self.attach(a.tail, b.head);
                self.attach(b.head, a.tail);
                Some(PathHandle {
                    head: a.head,
                    tail: b.tail,
                })
            }
        }
    }

    /// 反转列表
    pub fn reverse(&self, a: Path) -> Path {
        a.map(|h| PathHandle {
            head: h.tail,
            tail: h.head,
        })
    }

    /// 查看第一条边
    pub fn first(&self, a: Path) -> Option<EdgeId> {
        a.map(|h| h.head)
    }

    /// 移除并返回第一条边，以及剩余部分
    pub fn pop(&mut self, a: PathHandle) -> (EdgeId, Path) {
        let head = a.head;
        self.live[head.index()] = false;
        if head == a.tail {
            return (head, None);
        }

        let next = self.step(head, None);
        self.links[head.index()] = [None, None];
        if let Some(next) = next {
            self.detach(next, head);
        }
        (
            head,
            next.map(|n| PathHandle {
                head: n,
                tail: a.tail,
            }),
        )
    }

    /// 按顺序遍历列表（不修改）
    pub fn iter(&self, a: Path) -> PathIter<'_> {
        PathIter {
            list: self,
            current: a.map(|h| h.head),
            prev: None,
            tail: a.map(|h| h.tail),
        }
    }

    /// 列表长度，O(长度)
    pub fn len(&self, a: Path) -> usize {
        self.iter(a).count()
    }

    /// 从 `node` 出发、上一个节点为 `prev` 时的下一个节点
    fn step(&self, node: EdgeId, prev: Option<EdgeId>) -> Option<EdgeId> {
        self.links[node.index()]
            .iter()
            .flatten()
            .copied()
            .find(|&n| Some(n) != prev)
    }

    fn attach(&mut self, node: EdgeId, neighbor: EdgeId) {
        let slots = &mut self.links[node.index()];
        if slots[0].is_none() {
            slots[0] = Some(neighbor);
        } else {
            debug_assert!(slots[1].is_none(), "边 {} 不是列表端点", node);
            slots[1] = Some(neighbor);
        }
    }

    fn detach(&mut self, node: EdgeId, neighbor: EdgeId) {
        for slot in self.links[node.index()].iter_mut() {
            if *slot == Some(neighbor) {
                *slot = None;
                return;
            }
        }
    }
}

/// 列表遍历器
pub struct PathIter<'a> {
    list: &'a PathList,
    current: Option<EdgeId>,
    prev: Option<EdgeId>,
    tail: Option<EdgeId>,
}

impl Iterator for PathIter<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let node = self.current?;
        self.current = if Some(node) == self.tail {
            None
        } else {
            self.list.step(node, self.prev)
        };
        self.prev = Some(node);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(id: u32) -> EdgeId {
        EdgeId::new(id)
    }

    fn build(list: &mut PathList, ids: &[u32]) -> Path {
        let mut path = None;
        for &id in ids {
            let single = Some(list.singleton(e(id)));
            path = list.join(path, single);
        }
        path
    }

    fn collect(list: &PathList, path: Path) -> Vec<u32> {
        list.iter(path).map(|x| x.as_u32()).collect()
    }

    #[test]
    fn test_singleton_and_first() {
        let mut list = PathList::new(4);
        let h = list.singleton(e(3));
        assert_eq!(list.first(Some(h)), Some(e(3)));
        assert_eq!(h.last(), e(3));
        assert_eq!(collect(&list, Some(h)), vec![3]);
        assert_eq!(list.first(None), None);
    }

    #[test]
    fn test_join_keeps_order() {
        let mut list = PathList::new(6);
        let a = build(&mut list, &[1, 2, 3]);
        let b = build(&mut list, &[4, 5]);
        let ab = list.join(a, b);
        assert_eq!(collect(&list, ab), vec![1, 2, 3, 4, 5]);
        assert_eq!(list.len(ab), 5);
    }

    #[test]
    fn test_join_with_empty() {
        let mut list = PathList::new(3);
        let a = build(&mut list, &[1, 2]);
        let left = list.join(None, a);
        assert_eq!(collect(&list, left), vec![1, 2]);
        let right = list.join(left, None);
        assert_eq!(collect(&list, right), vec![1, 2]);
        assert_eq!(list.join(None, None), None);
    }

    #[test]
    fn test_reverse_then_join() {
        let mut list = PathList::new(8);
        let a = build(&mut list, &[1, 2, 3]);
        let ra = list.reverse(a);
        assert_eq!(collect(&list, ra), vec![3, 2, 1]);

        // 反转后的列表再与其他列表拼接，两端的连接方向都要正确
        let b = build(&mut list, &[4, 5]);
        let rb = list.reverse(b);
        let joined = list.join(ra, rb);
        assert_eq!(collect(&list, joined), vec![3, 2, 1, 5, 4]);

        let c = build(&mut list, &[6]);
        let back = list.reverse(joined);
        let all = list.join(c, back);
        assert_eq!(collect(&list, all), vec![6, 4, 5, 1, 2, 3]);
    }

    #[test]
    fn test_pop_drains_in_order() {
        let mut list = PathList::new(5);
        let a = build(&mut list, &[2, 4, 1]);
        let b = build(&mut list, &[5]);
        let ra = list.reverse(a);
        let mut path = list.join(ra, b);

        let mut popped = Vec::new();
        while let Some(h) = path {
            let (first, rest) = list.pop(h);
            popped.push(first.as_u32());
            path = rest;
        }
        assert_eq!(popped, vec![1, 4, 2, 5]);
    }

    #[test]
    fn test_popped_edge_can_be_reused() {
        let mut list = PathList::new(3);
        let a = build(&mut list, &[1, 2]);
        let (first, rest) = list.pop(a.unwrap());
        assert_eq!(first, e(1));
        assert_eq!(collect(&list, rest), vec![2]);

        let again = Some(list.singleton(e(1)));
        let joined = list.join(rest, again);
        assert_eq!(collect(&list, joined), vec![2, 1]);
    }

    #[test]
    fn test_reset_frees_all_nodes() {
        let mut list = PathList::new(2);
        let _ = build(&mut list, &[1, 2]);
        list.reset(2);
        let a = build(&mut list, &[2, 1]);
        assert_eq!(collect(&list, a), vec![2, 1]);
    }
}
