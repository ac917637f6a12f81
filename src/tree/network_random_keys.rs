//! Network-random-keys genotype for spanning trees over sparse graphs.
//!
//! One real-valued key in `[0, 1]` per candidate edge; decoding sorts the
//! edges by descending key and greedily inserts them Kruskal-style. Unlike
//! the Prüfer code this works over any connected candidate graph, but keys
//! carry no canonical inverse, so `encode` is unsupported.

use crate::chromosome::Chromosome;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::tree::tree::{KruskalTree, PotentialGraph, SpanningTree};
use std::cmp::Ordering;

/// Individual whose chromosome holds one bias key per potential edge.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkRandomKeys {
    graph: PotentialGraph,
    chromosome: Chromosome<f64>,
}

impl NetworkRandomKeys {
    pub fn new(graph: PotentialGraph) -> Result<Self> {
        if graph.edges().is_empty() {
            return Err(Error::config(
                "network random keys need a graph with at least one edge",
            ));
        }
        Ok(Self {
            chromosome: Chromosome::uniform(graph.edges().len(), 0.0, 1.0)?,
            graph,
        })
    }

    pub fn graph(&self) -> &PotentialGraph {
        &self.graph
    }

    /// Edge indices by descending key; ties break toward the lower index so
    /// decoding stays deterministic.
    fn edge_order(&self) -> Vec<usize> {
        let keys = self.chromosome.genes();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| {
            keys[b]
                .partial_cmp(&keys[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        order
    }
}

impl Individual for NetworkRandomKeys {
    type Gene = f64;
    type Phenotype = KruskalTree;

    fn chromosome(&self) -> &Chromosome<f64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<f64> {
        &mut self.chromosome
    }

    fn decode(&self) -> Result<KruskalTree> {
        let mut tree = KruskalTree::new(self.graph.clone());
        tree.initialize();
        for i in self.edge_order() {
            let (u, v) = self.graph.edges()[i];
            tree.add_edge(u, v);
        }
        tree.repair();
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_one_key_per_edge() {
        let g = PotentialGraph::complete(5).unwrap();
        let nrk = NetworkRandomKeys::new(g).unwrap();
        assert_eq!(nrk.chromosome().len(), 10);
    }

    #[test]
    fn test_decode_prefers_high_keys() {
        // Cycle 0-1-2-0: the lowest-keyed edge must be the one left out.
        let g = PotentialGraph::new(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        let mut nrk = NetworkRandomKeys::new(g).unwrap();
        nrk.chromosome_mut().update_genes(&[0.9, 0.1, 0.5]).unwrap();
        let tree = nrk.decode().unwrap();
        assert_eq!(tree.is_valid(), Some(true));
        let mut edges: Vec<(usize, usize)> = tree
            .edges()
            .iter()
            .map(|&(u, v)| if u < v { (u, v) } else { (v, u) })
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_decode_on_connected_graph_is_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        let g = PotentialGraph::complete(12).unwrap();
        let mut nrk = NetworkRandomKeys::new(g).unwrap();
        for _ in 0..20 {
            nrk.random_init(&mut rng).unwrap();
            let tree = nrk.decode().unwrap();
            assert_eq!(tree.is_valid(), Some(true));
            assert_eq!(tree.edges().len(), 11);
        }
    }

    #[test]
    fn test_decode_on_disconnected_graph_flags_invalid() {
        let g = PotentialGraph::new(4, &[(0, 1), (2, 3)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut nrk = NetworkRandomKeys::new(g).unwrap();
        nrk.random_init(&mut rng).unwrap();
        let tree = nrk.decode().unwrap();
        assert_eq!(tree.is_valid(), Some(false));
    }

    #[test]
    fn test_encode_not_supported() {
        let g = PotentialGraph::complete(4).unwrap();
        let mut nrk = NetworkRandomKeys::new(g).unwrap();
        let tree = nrk.decode().unwrap();
        assert!(matches!(nrk.encode(&tree), Err(Error::NotSupported(_))));
    }

    #[test]
    fn test_decode_is_deterministic_under_ties() {
        let g = PotentialGraph::complete(6).unwrap();
        let mut nrk = NetworkRandomKeys::new(g).unwrap();
        let keys = vec![0.5; nrk.chromosome().len()];
        nrk.chromosome_mut().update_genes(&keys).unwrap();
        let a = nrk.decode().unwrap();
        let b = nrk.decode().unwrap();
        assert_eq!(a.edges(), b.edges());
    }
}
