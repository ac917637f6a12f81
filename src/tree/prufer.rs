//! Prüfer-code genotype for spanning trees over the complete graph.
//!
//! A labelled tree on `n` vertices corresponds one-to-one with a sequence of
//! `n − 2` labels in `0..n`, so the chromosome is simply that sequence and
//! every gene vector inside the domain decodes to a valid tree. Both decode
//! and encode use the linear pointer-advance formulation.

use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::tree::tree::{KruskalTree, SpanningTree};

/// Individual whose chromosome is a Prüfer sequence of length `n − 2` with
/// each gene in `[0, n − 1]`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PruferCode {
    vertices: usize,
    chromosome: Chromosome<i64>,
}

impl PruferCode {
    /// Prüfer codes are defined for trees on at least 3 vertices (below
    /// that the sequence would be empty).
    pub fn new(vertices: usize) -> Result<Self> {
        if vertices < 3 {
            return Err(Error::config(
                "a Prüfer code needs at least 3 vertices",
            ));
        }
        Ok(Self {
            vertices,
            chromosome: Chromosome::uniform(vertices - 2, 0, vertices as i64 - 1)?,
        })
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    fn code(&self) -> Result<Vec<usize>> {
        let n = self.vertices;
        self.chromosome
            .genes()
            .iter()
            .map(|&g| {
                if g < 0 || g as usize >= n {
                    Err(Error::InvalidPhenotype(format!(
                        "Prüfer label {g} outside 0..{n}"
                    )))
                } else {
                    Ok(g as usize)
                }
            })
            .collect()
    }
}

impl Individual for PruferCode {
    type Gene = i64;
    type Phenotype = KruskalTree;

    fn chromosome(&self) -> &Chromosome<i64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<i64> {
        &mut self.chromosome
    }

    fn decode(&self) -> Result<KruskalTree> {
        let n = self.vertices;
        let code = self.code()?;
        let mut degree = vec![1usize; n];
        for &v in &code {
            degree[v] += 1;
        }
        let mut ptr = 0;
        while degree[ptr] != 1 {
            ptr += 1;
        }
        let mut leaf = ptr;

        let mut tree = KruskalTree::complete(n)?;
        tree.initialize();
        for &v in &code {
            tree.add_edge(leaf, v);
            degree[v] -= 1;
            if degree[v] == 1 && v < ptr {
                leaf = v;
            } else {
                ptr += 1;
                while ptr < n && degree[ptr] != 1 {
                    ptr += 1;
                }
                if ptr >= n {
                    return Err(Error::InvalidPhenotype(
                        "Prüfer decode ran out of leaves".to_string(),
                    ));
                }
                leaf = ptr;
            }
        }
        tree.add_edge(leaf, n - 1);
        tree.repair();
        Ok(tree)
    }

    fn encode(&mut self, tree: &KruskalTree) -> Result<()> {
        let n = self.vertices;
        if tree.vertices() != n {
            return Err(Error::InvalidPhenotype(format!(
                "tree has {} vertices, expected {n}",
                tree.vertices()
            )));
        }
        if tree.is_valid() != Some(true) {
            return Err(Error::InvalidPhenotype(
                "cannot encode an invalid or unrepaired tree".to_string(),
            ));
        }

        let mut adjacency = vec![Vec::new(); n];
        for &(u, v) in tree.edges() {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        // Root the tree at the highest label; its parent chain drives the
        // pointer-advance below.
        let root = n - 1;
        let mut parent = vec![usize::MAX; n];
        parent[root] = root;
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            for &v in &adjacency[u] {
                if parent[v] == usize::MAX {
                    parent[v] = u;
                    stack.push(v);
                }
            }
        }

        let mut degree: Vec<usize> = adjacency.iter().map(|a| a.len()).collect();
        let mut ptr = 0;
        while degree[ptr] != 1 {
            ptr += 1;
        }
        let mut leaf = ptr;

        let mut code = Vec::with_capacity(n - 2);
        for _ in 0..n - 2 {
            let next = parent[leaf];
            code.push(next as i64);
            degree[next] -= 1;
            if degree[next] == 1 && next < ptr {
                leaf = next;
            } else {
                ptr += 1;
                while degree[ptr] != 1 {
                    ptr += 1;
                }
                leaf = ptr;
            }
        }
        self.chromosome.update_genes(&code)
    }
}
