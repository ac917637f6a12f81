//! Spanning-tree phenotypes over a candidate edge universe.
//!
//! [`KruskalTree`] accepts edges in any order and rejects cycles through a
//! union-find; [`RootedTree`] grows from a connected frontier and tracks
//! parent pointers and depths. Both re-`initialize()` at the start of every
//! decode and only define their validity flag after [`SpanningTree::repair`]
//! has run.

use crate::error::{Error, Result};
use crate::tree::union_find::UnionFind;
use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Sentinel for "no parent assigned yet" in rooted trees.
const UNSET: usize = usize::MAX;

/// Normalizes an undirected edge for set-style comparison.
pub(crate) fn undirected(u: usize, v: usize) -> (usize, usize) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// The candidate edge universe a tree may draw from.
///
/// Edges are deduplicated as undirected pairs; self-loops are rejected.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotentialGraph {
    vertices: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
}

impl PotentialGraph {
    pub fn new(vertices: usize, edges: &[(usize, usize)]) -> Result<Self> {
        if vertices < 2 {
            return Err(Error::config("graph needs at least 2 vertices"));
        }
        let mut seen = std::collections::HashSet::new();
        let mut kept = Vec::with_capacity(edges.len());
        let mut adjacency = vec![Vec::new(); vertices];
        for &(u, v) in edges {
            if u >= vertices || v >= vertices {
                return Err(Error::config(format!(
                    "edge ({u}, {v}) references a vertex outside 0..{vertices}"
                )));
            }
            if u == v {
                return Err(Error::config(format!("self-loop ({u}, {v}) is not allowed")));
            }
            if seen.insert(undirected(u, v)) {
                kept.push((u, v));
                adjacency[u].push(v);
                adjacency[v].push(u);
            }
        }
        Ok(Self {
            vertices,
            edges: kept,
            adjacency,
        })
    }

    /// All `n·(n−1)/2` edges of the complete graph on `vertices` vertices.
    pub fn complete(vertices: usize) -> Result<Self> {
        let mut edges = Vec::with_capacity(vertices * (vertices.saturating_sub(1)) / 2);
        for i in 0..vertices {
            for j in 0..i {
                edges.push((j, i));
            }
        }
        Self::new(vertices, &edges)
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }
}

/// Common surface of spanning-tree phenotypes, used by the tree-aware
/// genetic operators.
pub trait SpanningTree: Clone {
    /// Number of vertices the tree must span.
    fn vertices(&self) -> usize;

    /// Candidate edge universe.
    fn potential_edges(&self) -> &[(usize, usize)];

    /// Edges currently in the tree, in insertion order.
    fn edges(&self) -> &[(usize, usize)];

    /// Clears all edges and per-decode scratch state.
    fn initialize(&mut self);

    /// True when `(u, v)` may be added under this tree's growth rule.
    fn try_add_edge(&mut self, u: usize, v: usize) -> bool;

    /// Adds `(u, v)` when permitted; returns whether the edge went in.
    fn add_edge(&mut self, u: usize, v: usize) -> bool;

    /// Finalizes the tree: recomputes validity and derived metrics.
    /// Before `repair` runs, [`SpanningTree::is_valid`] is `None`.
    fn repair(&mut self);

    /// `Some(true)` iff the edge set is a single connected acyclic spanning
    /// structure. Undefined (`None`) until `repair` has run.
    fn is_valid(&self) -> Option<bool>;

    /// Vertex path from `source` to `destination` along current edges;
    /// empty when unreachable.
    fn find_path(&self, source: usize, destination: usize) -> Vec<usize>;

    /// Replaces the edge set wholesale: initialize, insert every edge under
    /// the growth rule, then repair. Rooted trees reorder the edges first so
    /// arbitrary orderings are accepted.
    fn rebuild(&mut self, edges: &[(usize, usize)]) {
        self.initialize();
        for &(u, v) in edges {
            self.add_edge(u, v);
        }
        self.repair();
    }
}

fn build_adjacency(vertices: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); vertices];
    for &(u, v) in edges {
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    adjacency
}

/// Iterative DFS path search over an adjacency list.
fn dfs_path(adjacency: &[Vec<usize>], source: usize, destination: usize) -> Vec<usize> {
    let n = adjacency.len();
    if source >= n || destination >= n {
        return Vec::new();
    }
    let mut parent = vec![UNSET; n];
    let mut visited = vec![false; n];
    let mut stack = vec![source];
    visited[source] = true;
    while let Some(u) = stack.pop() {
        if u == destination {
            let mut path = vec![destination];
            let mut cur = destination;
            while cur != source {
                cur = parent[cur];
                path.push(cur);
            }
            path.reverse();
            return path;
        }
        for &v in &adjacency[u] {
            if !visited[v] {
                visited[v] = true;
                parent[v] = u;
                stack.push(v);
            }
        }
    }
    Vec::new()
}

fn spanning_validity(vertices: usize, edges: &[(usize, usize)], adjacency: &[Vec<usize>], root: usize) -> bool {
    if edges.len() != vertices - 1 {
        return false;
    }
    let mut visited = vec![false; vertices];
    let mut stack = vec![root];
    visited[root] = true;
    let mut reached = 1;
    while let Some(u) = stack.pop() {
        for &v in &adjacency[u] {
            if !visited[v] {
                visited[v] = true;
                reached += 1;
                stack.push(v);
            }
        }
    }
    reached == vertices
}

/// Spanning tree built by cycle avoidance: an edge goes in iff its endpoints
/// are in different union-find components, in whatever order the caller
/// supplies edges.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KruskalTree {
    graph: PotentialGraph,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
    uf: UnionFind,
    valid: Option<bool>,
}

impl KruskalTree {
    pub fn new(graph: PotentialGraph) -> Self {
        let n = graph.vertices();
        Self {
            graph,
            edges: Vec::with_capacity(n.saturating_sub(1)),
            adjacency: vec![Vec::new(); n],
            uf: UnionFind::new(n),
            valid: None,
        }
    }

    /// Tree over the complete graph on `vertices` vertices.
    pub fn complete(vertices: usize) -> Result<Self> {
        Ok(Self::new(PotentialGraph::complete(vertices)?))
    }

    pub fn graph(&self) -> &PotentialGraph {
        &self.graph
    }

    /// Builds a uniform-ish random spanning tree: draws one random key per
    /// potential edge and inserts edges in descending key order, skipping
    /// those that would close a cycle.
    pub fn kruskal_rst(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let keys: Vec<f64> = (0..self.graph.edges().len())
            .map(|_| rng.random::<f64>())
            .collect();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[b].partial_cmp(&keys[a]).unwrap_or(std::cmp::Ordering::Equal));
        self.initialize();
        for i in order {
            let (u, v) = self.graph.edges()[i];
            self.add_edge(u, v);
        }
        self.repair();
        if self.valid == Some(true) {
            Ok(())
        } else {
            Err(Error::UnconnectedGraph)
        }
    }
}

impl SpanningTree for KruskalTree {
    fn vertices(&self) -> usize {
        self.graph.vertices()
    }

    fn potential_edges(&self) -> &[(usize, usize)] {
        self.graph.edges()
    }

    fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    fn initialize(&mut self) {
        self.edges.clear();
        for adj in &mut self.adjacency {
            adj.clear();
        }
        self.uf.reset();
        self.valid = None;
    }

    fn try_add_edge(&mut self, u: usize, v: usize) -> bool {
        self.uf.disjoint(u, v)
    }

    fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if !self.try_add_edge(u, v) {
            return false;
        }
        self.uf.union(u, v);
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edges.push((u, v));
        true
    }

    fn repair(&mut self) {
        self.valid = Some(spanning_validity(
            self.graph.vertices(),
            &self.edges,
            &self.adjacency,
            0,
        ));
    }

    fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    fn find_path(&self, source: usize, destination: usize) -> Vec<usize> {
        dfs_path(&self.adjacency, source, destination)
    }
}

/// Spanning tree anchored at a root, tracking `parent[]` and `depth[]`.
///
/// `try_add_edge(u, v)` holds iff exactly one endpoint is already attached
/// (the XOR frontier rule), so the tree always grows as one connected
/// component hanging off the root. Arbitrary edge orderings go through
/// [`RootedTree::from_edge_list`], which BFS-sorts first.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootedTree {
    graph: PotentialGraph,
    root: usize,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
    parent: Vec<usize>,
    depth: Vec<usize>,
    valid: Option<bool>,
    max_depth: usize,
}

impl RootedTree {
    pub fn new(graph: PotentialGraph, root: usize) -> Result<Self> {
        let n = graph.vertices();
        if root >= n {
            return Err(Error::config(format!(
                "root {root} out of range for {n} vertices"
            )));
        }
        let mut tree = Self {
            graph,
            root,
            edges: Vec::with_capacity(n.saturating_sub(1)),
            adjacency: vec![Vec::new(); n],
            parent: vec![UNSET; n],
            depth: vec![UNSET; n],
            valid: None,
            max_depth: 0,
        };
        tree.initialize();
        Ok(tree)
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn graph(&self) -> &PotentialGraph {
        &self.graph
    }

    /// Parent pointer per vertex; `parent[root] == root`, unattached
    /// vertices hold `usize::MAX`.
    pub fn parents(&self) -> &[usize] {
        &self.parent
    }

    /// Depth per vertex; the root has depth 0.
    pub fn depths(&self) -> &[usize] {
        &self.depth
    }

    /// Longest root-to-leaf depth. Meaningful only after `repair` on a
    /// valid tree.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn attached(&self, u: usize) -> bool {
        self.parent[u] != UNSET
    }

    /// Prim-style random spanning tree: grows the frontier by picking a
    /// uniformly random eligible edge until every vertex is attached.
    pub fn prim_rst(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.initialize();
        let n = self.graph.vertices();
        let mut in_tree = vec![false; n];
        in_tree[self.root] = true;
        let mut attached_count = 1;
        // Eligible edge pool; swap_remove gives O(1) random removal.
        let mut pool: Vec<(usize, usize)> = self
            .graph
            .neighbors(self.root)
            .iter()
            .map(|&v| (self.root, v))
            .collect();

        while attached_count < n {
            if pool.is_empty() {
                return Err(Error::UnconnectedGraph);
            }
            let idx = rng.random_range(0..pool.len());
            let (u, v) = pool.swap_remove(idx);
            if !in_tree[v] {
                self.add_edge(u, v);
                in_tree[v] = true;
                attached_count += 1;
                for &w in self.graph.neighbors(v) {
                    if !in_tree[w] {
                        pool.push((v, w));
                    }
                }
            }
        }
        self.repair();
        Ok(())
    }

    /// Random-walk spanning tree (Broder/Aldous style over the candidate
    /// graph): walks random neighbors, adopting every first-visit edge.
    pub fn random_walk_rst(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.initialize();
        let n = self.graph.vertices();
        let mut visited = vec![false; n];
        visited[self.root] = true;
        let mut visited_count = 1;
        let mut v0 = self.root;
        // Visit count bound: a disconnected candidate graph would otherwise
        // walk forever inside one component.
        let mut steps: u64 = 0;
        let step_limit = (n as u64).saturating_mul(n as u64).saturating_mul(64).max(1 << 16);
        while visited_count < n {
            let neighbors = self.graph.neighbors(v0);
            if neighbors.is_empty() {
                return Err(Error::UnconnectedGraph);
            }
            let v1 = neighbors[rng.random_range(0..neighbors.len())];
            if !visited[v1] {
                self.add_edge(v0, v1);
                visited[v1] = true;
                visited_count += 1;
            }
            v0 = v1;
            steps += 1;
            if steps > step_limit {
                return Err(Error::UnconnectedGraph);
            }
        }
        self.repair();
        Ok(())
    }

    /// Reorders `edges` so every edge appears with its attached endpoint
    /// first, in BFS order from the root. Edges not reachable from the root
    /// are dropped.
    pub fn sort_by_bfs_order(&self, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let adjacency = build_adjacency(self.graph.vertices(), edges);
        let mut visited = vec![false; self.graph.vertices()];
        let mut ordered = Vec::with_capacity(edges.len());
        let mut queue = VecDeque::new();
        queue.push_back(self.root);
        visited[self.root] = true;
        while let Some(u) = queue.pop_front() {
            for &v in &adjacency[u] {
                if !visited[v] {
                    visited[v] = true;
                    ordered.push((u, v));
                    queue.push_back(v);
                }
            }
        }
        ordered
    }

    /// Rebuilds the tree from an arbitrary edge list and reports whether the
    /// result spans all vertices.
    pub fn from_edge_list(&mut self, edges: &[(usize, usize)]) -> Result<bool> {
        self.rebuild(edges);
        Ok(self.valid == Some(true))
    }
}

impl SpanningTree for RootedTree {
    fn vertices(&self) -> usize {
        self.graph.vertices()
    }

    fn potential_edges(&self) -> &[(usize, usize)] {
        self.graph.edges()
    }

    fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    fn initialize(&mut self) {
        self.edges.clear();
        for adj in &mut self.adjacency {
            adj.clear();
        }
        self.parent.fill(UNSET);
        self.depth.fill(UNSET);
        self.parent[self.root] = self.root;
        self.depth[self.root] = 0;
        self.valid = None;
        self.max_depth = 0;
    }

    fn try_add_edge(&mut self, u: usize, v: usize) -> bool {
        self.attached(u) ^ self.attached(v)
    }

    fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if !self.try_add_edge(u, v) {
            return false;
        }
        if self.attached(v) {
            self.parent[u] = v;
            self.depth[u] = self.depth[v] + 1;
        } else {
            self.parent[v] = u;
            self.depth[v] = self.depth[u] + 1;
        }
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edges.push((u, v));
        true
    }

    fn repair(&mut self) {
        let valid = spanning_validity(
            self.graph.vertices(),
            &self.edges,
            &self.adjacency,
            self.root,
        );
        self.max_depth = if valid {
            self.depth.iter().copied().max().unwrap_or(0)
        } else {
            0
        };
        self.valid = Some(valid);
    }

    fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    fn find_path(&self, source: usize, destination: usize) -> Vec<usize> {
        dfs_path(&self.adjacency, source, destination)
    }

    fn rebuild(&mut self, edges: &[(usize, usize)]) {
        let ordered = self.sort_by_bfs_order(edges);
        self.initialize();
        for (u, v) in ordered {
            self.add_edge(u, v);
        }
        self.repair();
    }
}
