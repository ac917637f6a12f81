//! Recombination operators.
//!
//! Every operator gates on its crossover probability `pc` first: a failed
//! gate returns plain deep copies of the parents. Gene-level operators act
//! on the chromosome; the tree operators recombine decoded phenotypes and
//! encode the result back, so they require an encodable representation.

use crate::chromosome::Gene;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::Crossover;
use crate::tree::tree::{KruskalTree, RootedTree, SpanningTree};
use crate::tree::undirected;
use rand::seq::{index, SliceRandom};
use rand::{Rng, RngCore};
use std::collections::HashSet;

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::config(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn same_length<I: Individual>(father: &I, mother: &I) -> Result<usize> {
    let n = father.chromosome().len();
    if mother.chromosome().len() != n {
        return Err(Error::LengthMismatch {
            expected: n,
            actual: mother.chromosome().len(),
        });
    }
    Ok(n)
}

/// Per-gene exchange: each gene position swaps between the offspring with
/// probability `pe`.
#[derive(Debug, Clone)]
pub struct UniformCrossover {
    pc: f64,
    pe: f64,
}

impl UniformCrossover {
    pub fn new(pc: f64, pe: f64) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        check_probability("exchange probability", pe)?;
        Ok(Self { pc, pe })
    }
}

impl<I: Individual> Crossover<I> for UniformCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        let n = same_length(father, mother)?;
        let mut child1 = father.clone();
        let mut child2 = mother.clone();
        if rng.random::<f64>() >= self.pc {
            return Ok((child1, child2));
        }
        let mut g1 = father.chromosome().genes().to_vec();
        let mut g2 = mother.chromosome().genes().to_vec();
        for i in 0..n {
            if rng.random::<f64>() < self.pe {
                std::mem::swap(&mut g1[i], &mut g2[i]);
            }
        }
        child1.chromosome_mut().update_genes(&g1)?;
        child2.chromosome_mut().update_genes(&g2)?;
        Ok((child1, child2))
    }
}

/// Classic k-point crossover: `points` distinct cut positions, alternating
/// segments between the offspring.
#[derive(Debug, Clone)]
pub struct PointCrossover {
    pc: f64,
    points: usize,
}

impl PointCrossover {
    pub fn new(pc: f64, points: usize) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        if points == 0 {
            return Err(Error::config("point crossover needs at least 1 cut point"));
        }
        Ok(Self { pc, points })
    }
}

impl<I: Individual> Crossover<I> for PointCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        let n = same_length(father, mother)?;
        if self.points >= n {
            return Err(Error::config(format!(
                "{} cut points do not fit a chromosome of length {n}",
                self.points
            )));
        }
        let mut child1 = father.clone();
        let mut child2 = mother.clone();
        if rng.random::<f64>() >= self.pc {
            return Ok((child1, child2));
        }
        // Cuts land strictly inside the chromosome.
        let mut cuts: Vec<usize> = index::sample(rng, n - 1, self.points)
            .into_iter()
            .map(|c| c + 1)
            .collect();
        cuts.sort_unstable();
        cuts.push(n);

        let mut g1 = father.chromosome().genes().to_vec();
        let mut g2 = mother.chromosome().genes().to_vec();
        let mut swap = false;
        let mut start = 0;
        for cut in cuts {
            if swap {
                for i in start..cut {
                    std::mem::swap(&mut g1[i], &mut g2[i]);
                }
            }
            swap = !swap;
            start = cut;
        }
        child1.chromosome_mut().update_genes(&g1)?;
        child2.chromosome_mut().update_genes(&g2)?;
        Ok((child1, child2))
    }
}

/// Order crossover (OX) for permutation chromosomes: keeps a slice from one
/// parent and fills the remainder in the other parent's relative order.
#[derive(Debug, Clone)]
pub struct OrderCrossover {
    pc: f64,
}

impl OrderCrossover {
    pub fn new(pc: f64) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        Ok(Self { pc })
    }

    fn offspring(keep: &[i64], fill: &[i64], lo: usize, hi: usize) -> Vec<i64> {
        let n = keep.len();
        let kept: HashSet<i64> = keep[lo..hi].iter().copied().collect();
        let mut child = vec![0i64; n];
        child[lo..hi].copy_from_slice(&keep[lo..hi]);
        // Walk the other parent cyclically starting after the slice.
        let mut pos = hi % n;
        for offset in 0..n {
            let candidate = fill[(hi + offset) % n];
            if !kept.contains(&candidate) {
                child[pos] = candidate;
                pos = (pos + 1) % n;
            }
        }
        child
    }
}

impl<I: Individual<Gene = i64>> Crossover<I> for OrderCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        let n = same_length(father, mother)?;
        if n < 2 {
            return Err(Error::config("order crossover needs at least 2 genes"));
        }
        let mut child1 = father.clone();
        let mut child2 = mother.clone();
        if rng.random::<f64>() >= self.pc {
            return Ok((child1, child2));
        }
        let mut picks = index::sample(rng, n + 1, 2).into_vec();
        picks.sort_unstable();
        let (lo, hi) = (picks[0], picks[1]);

        let g1 = father.chromosome().genes();
        let g2 = mother.chromosome().genes();
        child1
            .chromosome_mut()
            .update_genes(&Self::offspring(g1, g2, lo, hi))?;
        child2
            .chromosome_mut()
            .update_genes(&Self::offspring(g2, g1, lo, hi))?;
        Ok((child1, child2))
    }
}

const SBX_EPS: f64 = 1e-14;

/// Simulated binary crossover for real-coded chromosomes.
///
/// The distribution index `eta` controls the spread: large values keep
/// offspring close to the parents. Offspring genes are clamped into the
/// gene's domain and swapped between children with probability 0.5.
#[derive(Debug, Clone)]
pub struct SbxCrossover {
    pc: f64,
    eta: f64,
}

impl SbxCrossover {
    pub fn new(pc: f64, eta: f64) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        if eta <= 0.0 {
            return Err(Error::config(format!(
                "SBX distribution index must be positive, got {eta}"
            )));
        }
        Ok(Self { pc, eta })
    }

    fn betaq(&self, beta: f64, u: f64) -> f64 {
        let alpha = 2.0 - beta.powf(-(self.eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / (self.eta + 1.0))
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / (self.eta + 1.0))
        }
    }

    fn cross_pair(&self, a: f64, b: f64, lo: f64, hi: f64, u: f64) -> (f64, f64) {
        let (y1, y2) = if a < b { (a, b) } else { (b, a) };
        let delta = (y2 - y1).max(1e-10);

        let beta = 1.0 + 2.0 * (y1 - lo) / delta;
        let betaq = self.betaq(beta, u);
        let c1 = 0.5 * (y1 + y2 - betaq * delta);

        let beta = 1.0 + 2.0 * (hi - y2) / delta;
        let betaq = self.betaq(beta, u);
        let c2 = 0.5 * (y1 + y2 + betaq * delta);

        (
            f64::clamp_to(c1, lo, hi),
            f64::clamp_to(c2, lo, hi),
        )
    }
}

impl<I: Individual<Gene = f64>> Crossover<I> for SbxCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        let n = same_length(father, mother)?;
        let mut child1 = father.clone();
        let mut child2 = mother.clone();
        if rng.random::<f64>() >= self.pc {
            return Ok((child1, child2));
        }
        let mut g1 = father.chromosome().genes().to_vec();
        let mut g2 = mother.chromosome().genes().to_vec();
        let lower = father.chromosome().lower_bounds();
        let upper = father.chromosome().upper_bounds();
        for i in 0..n {
            // Each gene recombines only half the time, and identical
            // parent genes pass through unchanged.
            if rng.random::<f64>() > 0.5 || (g1[i] - g2[i]).abs() <= SBX_EPS {
                continue;
            }
            let u: f64 = rng.random();
            let (mut c1, mut c2) = self.cross_pair(g1[i], g2[i], lower[i], upper[i], u);
            if rng.random::<f64>() < 0.5 {
                std::mem::swap(&mut c1, &mut c2);
            }
            g1[i] = c1;
            g2[i] = c2;
        }
        child1.chromosome_mut().update_genes(&g1)?;
        child2.chromosome_mut().update_genes(&g2)?;
        Ok((child1, child2))
    }
}

/// Edge-set recombination for Kruskal-style trees: edges shared by both
/// parents are inherited as-is, the rest are shuffled and inserted greedily
/// under the cycle-avoidance rule.
#[derive(Debug, Clone)]
pub struct KruskalCrossover {
    pc: f64,
}

impl KruskalCrossover {
    pub fn new(pc: f64) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        Ok(Self { pc })
    }

    fn offspring<I>(
        &self,
        parent: &I,
        template: &KruskalTree,
        shared: &[(usize, usize)],
        rest: &[(usize, usize)],
        rng: &mut dyn RngCore,
    ) -> Result<I>
    where
        I: Individual<Phenotype = KruskalTree>,
    {
        let mut tree = template.clone();
        tree.initialize();
        for &(u, v) in shared {
            tree.add_edge(u, v);
        }
        let mut pool = rest.to_vec();
        pool.shuffle(rng);
        for (u, v) in pool {
            tree.add_edge(u, v);
        }
        tree.repair();
        if tree.is_valid() != Some(true) {
            return Err(Error::UnconnectedGraph);
        }
        let mut child = parent.clone();
        child.encode(&tree)?;
        Ok(child)
    }
}

impl<I: Individual<Phenotype = KruskalTree>> Crossover<I> for KruskalCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        if rng.random::<f64>() >= self.pc {
            return Ok((father.clone(), mother.clone()));
        }
        let t1 = father.decode()?;
        let t2 = mother.decode()?;

        let set1: HashSet<(usize, usize)> =
            t1.edges().iter().map(|&(u, v)| undirected(u, v)).collect();
        let set2: HashSet<(usize, usize)> =
            t2.edges().iter().map(|&(u, v)| undirected(u, v)).collect();
        // Sorted so offspring depend only on the RNG, not on hash order.
        let mut shared: Vec<(usize, usize)> = set1.intersection(&set2).copied().collect();
        shared.sort_unstable();
        let mut rest: Vec<(usize, usize)> =
            set1.symmetric_difference(&set2).copied().collect();
        rest.sort_unstable();

        let child1 = self.offspring(father, &t1, &shared, &rest, rng)?;
        let child2 = self.offspring(mother, &t1, &shared, &rest, rng)?;
        Ok((child1, child2))
    }
}

/// Frontier-growth recombination for rooted trees: offspring grow from the
/// root by randomly picking eligible edges out of the union of both
/// parents' edge sets.
#[derive(Debug, Clone)]
pub struct PrimCrossover {
    pc: f64,
}

impl PrimCrossover {
    pub fn new(pc: f64) -> Result<Self> {
        check_probability("crossover probability", pc)?;
        Ok(Self { pc })
    }

    fn offspring<I>(
        &self,
        parent: &I,
        template: &RootedTree,
        union_adjacency: &[Vec<usize>],
        rng: &mut dyn RngCore,
    ) -> Result<I>
    where
        I: Individual<Phenotype = RootedTree>,
    {
        let mut tree = template.clone();
        tree.initialize();
        let n = tree.vertices();
        let root = tree.root();
        let mut in_tree = vec![false; n];
        in_tree[root] = true;
        let mut attached = 1;
        let mut pool: Vec<(usize, usize)> = union_adjacency[root]
            .iter()
            .map(|&v| (root, v))
            .collect();
        while attached < n {
            if pool.is_empty() {
                return Err(Error::UnconnectedGraph);
            }
            let idx = rng.random_range(0..pool.len());
            let (u, v) = pool.swap_remove(idx);
            if !in_tree[v] {
                tree.add_edge(u, v);
                in_tree[v] = true;
                attached += 1;
                for &w in &union_adjacency[v] {
                    if !in_tree[w] {
                        pool.push((v, w));
                    }
                }
            }
        }
        tree.repair();
        let mut child = parent.clone();
        child.encode(&tree)?;
        Ok(child)
    }
}

impl<I: Individual<Phenotype = RootedTree>> Crossover<I> for PrimCrossover {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)> {
        if rng.random::<f64>() >= self.pc {
            return Ok((father.clone(), mother.clone()));
        }
        let t1 = father.decode()?;
        let t2 = mother.decode()?;

        let union: HashSet<(usize, usize)> = t1
            .edges()
            .iter()
            .chain(t2.edges())
            .map(|&(u, v)| undirected(u, v))
            .collect();
        // Sorted so offspring depend only on the RNG, not on hash order.
        let mut union: Vec<(usize, usize)> = union.into_iter().collect();
        union.sort_unstable();
        let mut adjacency = vec![Vec::new(); t1.vertices()];
        for &(u, v) in &union {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        let child1 = self.offspring(father, &t1, &adjacency, rng)?;
        let child2 = self.offspring(mother, &t1, &adjacency, rng)?;
        Ok((child1, child2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{BinaryIndividual, FloatIndividual, PermutationIndividual};
    use crate::tree::PruferCode;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_gate_returns_clones() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut a = BinaryIndividual::new(16).unwrap();
        let mut b = BinaryIndividual::new(16).unwrap();
        a.random_init(&mut rng).unwrap();
        b.random_init(&mut rng).unwrap();
        let op = UniformCrossover::new(0.0, 0.5).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        assert_eq!(c1.chromosome().genes(), a.chromosome().genes());
        assert_eq!(c2.chromosome().genes(), b.chromosome().genes());
    }

    #[test]
    fn test_uniform_preserves_gene_multiset_per_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut a = BinaryIndividual::new(32).unwrap();
        let mut b = BinaryIndividual::new(32).unwrap();
        a.random_init(&mut rng).unwrap();
        b.random_init(&mut rng).unwrap();
        let op = UniformCrossover::new(1.0, 0.5).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        for i in 0..32 {
            let parents = [a.chromosome().genes()[i], b.chromosome().genes()[i]];
            let mut children = [c1.chromosome().genes()[i], c2.chromosome().genes()[i]];
            children.sort_unstable();
            let mut sorted_parents = parents;
            sorted_parents.sort_unstable();
            assert_eq!(children, sorted_parents);
        }
    }

    #[test]
    fn test_single_point_swaps_suffix() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut a = BinaryIndividual::new(8).unwrap();
        let mut b = BinaryIndividual::new(8).unwrap();
        a.encode(&vec![false; 8]).unwrap();
        b.encode(&vec![true; 8]).unwrap();
        let op = PointCrossover::new(1.0, 1).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        // Exactly one contiguous block of each gene value per child.
        let ones1 = c1.chromosome().genes().iter().filter(|&&g| g == 1).count();
        let ones2 = c2.chromosome().genes().iter().filter(|&&g| g == 1).count();
        assert_eq!(ones1 + ones2, 8);
        assert!(ones1 > 0 && ones1 < 8);
    }

    #[test]
    fn test_point_crossover_too_many_cuts() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = BinaryIndividual::new(4).unwrap();
        let b = BinaryIndividual::new(4).unwrap();
        let op = PointCrossover::new(1.0, 4).unwrap();
        assert!(op.cross(&a, &b, &mut rng).is_err());
    }

    #[test]
    fn test_order_crossover_keeps_permutations() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut a = PermutationIndividual::new(10).unwrap();
        let mut b = PermutationIndividual::new(10).unwrap();
        let op = OrderCrossover::new(1.0).unwrap();
        for _ in 0..30 {
            a.random_init(&mut rng).unwrap();
            b.random_init(&mut rng).unwrap();
            let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
            for c in [&c1, &c2] {
                let seen: HashSet<usize> = c.decode().unwrap().into_iter().collect();
                assert_eq!(seen.len(), 10);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_sbx_respects_bounds(seed in 0u64..1000, eta in 1.0f64..40.0) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut a = FloatIndividual::new(8, -3.0, 7.0).unwrap();
            let mut b = FloatIndividual::new(8, -3.0, 7.0).unwrap();
            a.random_init(&mut rng).unwrap();
            b.random_init(&mut rng).unwrap();
            let op = SbxCrossover::new(0.9, eta).unwrap();
            let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
            for c in [&c1, &c2] {
                for &g in c.chromosome().genes() {
                    prop_assert!((-3.0..=7.0).contains(&g), "gene {} escaped the domain", g);
                }
            }
        }
    }

    #[test]
    fn test_sbx_identical_parents_pass_through() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut a = FloatIndividual::new(4, 0.0, 1.0).unwrap();
        a.random_init(&mut rng).unwrap();
        let b = a.clone();
        let op = SbxCrossover::new(1.0, 10.0).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        assert_eq!(c1.chromosome().genes(), a.chromosome().genes());
        assert_eq!(c2.chromosome().genes(), a.chromosome().genes());
    }

    #[test]
    fn test_kruskal_crossover_children_are_spanning_trees() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut a = PruferCode::new(12).unwrap();
        let mut b = PruferCode::new(12).unwrap();
        a.random_init(&mut rng).unwrap();
        b.random_init(&mut rng).unwrap();
        let op = KruskalCrossover::new(1.0).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        for c in [&c1, &c2] {
            let tree = c.decode().unwrap();
            assert_eq!(tree.is_valid(), Some(true));
            assert_eq!(tree.edges().len(), 11);
        }
    }

    // Minimal rooted-tree individual for exercising the Prim operator:
    // the chromosome stores the edge list verbatim, two genes per edge.
    #[derive(Debug, Clone)]
    struct RootedEdgeList {
        chromosome: crate::chromosome::Chromosome<i64>,
        graph: crate::tree::PotentialGraph,
        root: usize,
    }

    impl RootedEdgeList {
        fn from_tree(tree: &RootedTree) -> Self {
            let n = tree.vertices();
            let mut ind = Self {
                chromosome: crate::chromosome::Chromosome::uniform(
                    2 * (n - 1),
                    0,
                    n as i64 - 1,
                )
                .unwrap(),
                graph: tree.graph().clone(),
                root: tree.root(),
            };
            ind.encode(tree).unwrap();
            ind
        }
    }

    impl Individual for RootedEdgeList {
        type Gene = i64;
        type Phenotype = RootedTree;

        fn chromosome(&self) -> &crate::chromosome::Chromosome<i64> {
            &self.chromosome
        }

        fn chromosome_mut(&mut self) -> &mut crate::chromosome::Chromosome<i64> {
            &mut self.chromosome
        }

        fn decode(&self) -> crate::error::Result<RootedTree> {
            let edges: Vec<(usize, usize)> = self
                .chromosome
                .genes()
                .chunks_exact(2)
                .map(|c| (c[0] as usize, c[1] as usize))
                .collect();
            let mut tree = RootedTree::new(self.graph.clone(), self.root)?;
            tree.from_edge_list(&edges)?;
            Ok(tree)
        }

        fn encode(&mut self, tree: &RootedTree) -> crate::error::Result<()> {
            let mut genes = Vec::with_capacity(2 * tree.edges().len());
            for &(u, v) in tree.edges() {
                genes.push(u as i64);
                genes.push(v as i64);
            }
            self.chromosome.update_genes(&genes)
        }
    }

    #[test]
    fn test_prim_crossover_children_span_within_parent_union() {
        let mut rng = StdRng::seed_from_u64(17);
        let graph = crate::tree::PotentialGraph::complete(10).unwrap();
        let mut t1 = RootedTree::new(graph.clone(), 0).unwrap();
        let mut t2 = RootedTree::new(graph, 0).unwrap();
        t1.prim_rst(&mut rng).unwrap();
        t2.prim_rst(&mut rng).unwrap();
        let a = RootedEdgeList::from_tree(&t1);
        let b = RootedEdgeList::from_tree(&t2);

        let union: HashSet<(usize, usize)> = t1
            .edges()
            .iter()
            .chain(t2.edges())
            .map(|&(u, v)| undirected(u, v))
            .collect();

        let op = PrimCrossover::new(1.0).unwrap();
        let (c1, c2) = op.cross(&a, &b, &mut rng).unwrap();
        for c in [&c1, &c2] {
            let tree = c.decode().unwrap();
            assert_eq!(tree.is_valid(), Some(true));
            assert_eq!(tree.edges().len(), 9);
            for &(u, v) in tree.edges() {
                assert!(union.contains(&undirected(u, v)));
            }
        }
    }

    #[test]
    fn test_kruskal_crossover_inherits_shared_edges() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut a = PruferCode::new(8).unwrap();
        a.random_init(&mut rng).unwrap();
        let b = a.clone();
        // Identical parents: every edge is shared, so children must equal
        // the parents.
        let op = KruskalCrossover::new(1.0).unwrap();
        let (c1, _) = op.cross(&a, &b, &mut rng).unwrap();
        let canon = |t: &crate::tree::KruskalTree| {
            let mut e: Vec<(usize, usize)> =
                t.edges().iter().map(|&(u, v)| undirected(u, v)).collect();
            e.sort_unstable();
            e
        };
        assert_eq!(canon(&c1.decode().unwrap()), canon(&a.decode().unwrap()));
    }
}
