//! Disjoint-set forest used by Kruskal-style spanning-tree construction.
//!
//! Union by rank with path compression; amortized near-constant `find`.
//! This is internal mutable scratch state: it is reset by the owning tree's
//! `initialize()` at the start of every decode and never shared across
//! individuals.

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    /// `n` singleton components.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Resets every vertex back to its own component.
    pub fn reset(&mut self) {
        for (i, p) in self.parent.iter_mut().enumerate() {
            *p = i;
        }
        self.rank.fill(0);
    }

    /// Representative of `u`'s component, compressing the path walked.
    pub fn find(&mut self, u: usize) -> usize {
        let mut root = u;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = u;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merges the components of `u` and `v`. Returns false when they were
    /// already connected.
    pub fn union(&mut self, u: usize, v: usize) -> bool {
        let ur = self.find(u);
        let vr = self.find(v);
        if ur == vr {
            return false;
        }
        if self.rank[ur] < self.rank[vr] {
            self.parent[ur] = vr;
        } else if self.rank[ur] > self.rank[vr] {
            self.parent[vr] = ur;
        } else {
            self.parent[vr] = ur;
            self.rank[ur] += 1;
        }
        true
    }

    /// True when `u` and `v` are in different components.
    pub fn disjoint(&mut self, u: usize, v: usize) -> bool {
        self.find(u) != self.find(v)
    }
}
