//! 花（blossom）划分
//!
//! 基于数组的并查集：按秩合并 + 路径减半。每个集合额外记录一个
//! origin（花的底，base），搜索阶段内集合只合并不拆分，阶段开始时整体重置。

use crate::graph::VertexId;

/// 花划分
#[derive(Debug, Clone)]
pub struct BlossomPartition {
    /// 父指针（下标 0 不使用）
    parent: Vec<u32>,
    /// 秩
    rank: Vec<u8>,
    /// 集合根到花底顶点的映射
    origin: Vec<u32>,
}

impl BlossomPartition {
    /// 创建 `n` 个单元素集合，每个顶点都是自己的花底
    pub fn new(n: usize) -> Self {
        let mut partition = Self {
            parent: Vec::new(),
            rank: Vec::new(),
            origin: Vec::new(),
        };
        partition.reset(n);
        partition
    }

    /// 重置为 `n` 个单元素集合
    pub fn reset(&mut self, n: usize) {
        self.parent.clear();
        self.parent.extend(0..=n as u32);
        self.rank.clear();
        self.rank.resize(n + 1, 0);
        self.origin.clear();
        self.origin.extend(0..=n as u32);
    }

    /// 查找所在集合的根
    pub fn find(&mut self, u: VertexId) -> VertexId {
        let mut x = u.as_u32();
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        VertexId::new(x)
    }

    /// 合并两个根所在的集合，返回新的根
    ///
    /// 两个参数都必须是根；若相同则原样返回
    pub fn union(&mut self, root1: VertexId, root2: VertexId) -> VertexId {
        let (a, b) = (root1.index(), root2.index());
        debug_assert_eq!(self.parent[a] as usize, a, "{} 不是集合的根", root1);
        debug_assert_eq!(self.parent[b] as usize, b, "{} 不是集合的根", root2);
        if a == b {
            return root1;
        }

        match self.rank[a].cmp(&self.rank[b]) {
            std::cmp::Ordering::Less => {
                self.parent[a] = b as u32;
                root2
            }
            std::cmp::Ordering::Greater => {
                self.parent[b] = a as u32;
                root1
            }
            std::cmp::Ordering::Equal => {
                self.parent[b] = a as u32;
                self.rank[a] += 1;
                root1
            }
        }
    }

    /// 集合根对应的花底
    pub fn origin(&self, root: VertexId) -> VertexId {
        VertexId::new(self.origin[root.index()])
    }

    /// 设置集合根对应的花底
    pub fn set_origin(&mut self, root: VertexId, v: VertexId) {
        self.origin[root.index()] = v.as_u32();
    }

    /// `origin(find(u))`：顶点所在花的花底
    pub fn base(&mut self, u: VertexId) -> VertexId {
        let root = self.find(u);
        self.origin(root)
    }

    /// 把 `u` 所在的花并入 `base` 所在的花，合并后的花底为 `base`
    pub fn absorb(&mut self, u: VertexId, base: VertexId) {
        let ru = self.find(u);
        let rb = self.find(base);
        let root = self.union(ru, rb);
        self.set_origin(root, base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    #[test]
    fn test_new_creates_singletons() {
        let mut p = BlossomPartition::new(5);
        for i in 1..=5 {
            assert_eq!(p.find(v(i)), v(i));
            assert_eq!(p.base(v(i)), v(i));
        }
    }

    #[test]
    fn test_union_and_origin() {
        let mut p = BlossomPartition::new(6);
        let r = p.union(v(1), v(2));
        p.set_origin(r, v(2));
        assert_eq!(p.find(v(1)), p.find(v(2)));
        assert_eq!(p.base(v(1)), v(2));

        p.absorb(v(3), v(2));
        p.absorb(v(4), v(2));
        for i in 1..=4 {
            assert_eq!(p.base(v(i)), v(2));
        }
        assert_eq!(p.base(v(5)), v(5));
        assert_ne!(p.find(v(5)), p.find(v(1)));
    }

    #[test]
    fn test_union_same_root_is_noop() {
        let mut p = BlossomPartition::new(3);
        assert_eq!(p.union(v(2), v(2)), v(2));
        assert_eq!(p.find(v(2)), v(2));
    }

    #[test]
    fn test_reset_restores_singletons() {
        let mut p = BlossomPartition::new(4);
        p.absorb(v(1), v(3));
        p.absorb(v(2), v(3));
        p.reset(4);
        for i in 1..=4 {
            assert_eq!(p.base(v(i)), v(i));
        }
    }

    #[test]
    fn test_long_chain_compresses() {
        let n = 1000;
        let mut p = BlossomPartition::new(n);
        for i in 2..=n as u32 {
            p.absorb(v(i), v(1));
        }
        for i in 1..=n as u32 {
            assert_eq!(p.base(v(i)), v(1));
        }
    }
}
