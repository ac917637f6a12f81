//! Mutation operators.
//!
//! All operators return a perturbed deep copy and leave the input untouched.

use crate::chromosome::Gene;
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::Mutation;
use crate::tree::tree::SpanningTree;
use crate::tree::undirected;
use rand::seq::index;
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

/// Bit-flip mutation for binary chromosomes: gated per individual by `pm`,
/// then each gene flips with probability `pe`.
#[derive(Debug, Clone)]
pub struct FlipBitMutation {
    pm: f64,
    pe: f64,
}

impl FlipBitMutation {
    /// The per-gene flip probability defaults to `pm`.
    pub fn new(pm: f64) -> Result<Self> {
        Self::with_flip_probability(pm, pm)
    }

    /// Sets an explicit per-gene flip probability.
    pub fn with_flip_probability(pm: f64, pe: f64) -> Result<Self> {
        check_probability("mutation probability", pm)?;
        check_probability("per-gene flip probability", pe)?;
        Ok(Self { pm, pe })
    }
}

impl<I: Individual<Gene = i64>> Mutation<I> for FlipBitMutation {
    fn mutate(&self, individual: &I, rng: &mut dyn RngCore) -> Result<I> {
        let mut child = individual.clone();
        if rng.random::<f64>() >= self.pm {
            return Ok(child);
        }
        let mut genes = individual.chromosome().genes().to_vec();
        for g in &mut genes {
            if rng.random::<f64>() < self.pe {
                *g ^= 1;
            }
        }
        child.chromosome_mut().update_genes(&genes)?;
        Ok(child)
    }
}

/// Polynomial mutation for real-coded chromosomes.
///
/// No outer gate: every gene mutates independently with probability `pm`,
/// drawing a bounded perturbation whose spread shrinks as `eta` grows.
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    pm: f64,
    eta: f64,
}

impl PolynomialMutation {
    pub fn new(pm: f64, eta: f64) -> Result<Self> {
        check_probability("per-gene mutation probability", pm)?;
        if eta <= 0.0 {
            return Err(Error::config(format!(
                "polynomial mutation distribution index must be positive, got {eta}"
            )));
        }
        Ok(Self { pm, eta })
    }

    fn perturb(&self, y: f64, lo: f64, hi: f64, u: f64) -> f64 {
        let range = hi - lo;
        let mut_pow = 1.0 / (self.eta + 1.0);
        let deltaq = if u < 0.5 {
            let xy = 1.0 - (y - lo) / range;
            let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(self.eta + 1.0);
            val.powf(mut_pow) - 1.0
        } else {
            let xy = 1.0 - (hi - y) / range;
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(self.eta + 1.0);
            1.0 - val.powf(mut_pow)
        };
        f64::clamp_to(y + deltaq * range, lo, hi)
    }
}

impl<I: Individual<Gene = f64>> Mutation<I> for PolynomialMutation {
    fn mutate(&self, individual: &I, rng: &mut dyn RngCore) -> Result<I> {
        let mut child = individual.clone();
        let mut genes = individual.chromosome().genes().to_vec();
        let lower = individual.chromosome().lower_bounds();
        let upper = individual.chromosome().upper_bounds();
        for i in 0..genes.len() {
            if rng.random::<f64>() < self.pm {
                let u: f64 = rng.random();
                genes[i] = self.perturb(genes[i], lower[i], upper[i], u);
            }
        }
        child.chromosome_mut().update_genes(&genes)?;
        Ok(child)
    }
}

/// Swap mutation for permutations: gated by `pm`, then `points` random
/// index pairs exchange their genes.
#[derive(Debug, Clone)]
pub struct SwapMutation {
    pm: f64,
    points: usize,
}

impl SwapMutation {
    pub fn new(pm: f64, points: usize) -> Result<Self> {
        check_probability("mutation probability", pm)?;
        if points == 0 {
            return Err(Error::config("swap mutation needs at least 1 swap"));
        }
        Ok(Self { pm, points })
    }
}

impl<I: Individual> Mutation<I> for SwapMutation {
    fn mutate(&self, individual: &I, rng: &mut dyn RngCore) -> Result<I> {
        let mut child = individual.clone();
        if rng.random::<f64>() >= self.pm {
            return Ok(child);
        }
        let n = individual.chromosome().len();
        if n < 2 {
            return Err(Error::config("swap mutation needs at least 2 genes"));
        }
        let mut genes = individual.chromosome().genes().to_vec();
        for _ in 0..self.points {
            let picks = index::sample(rng, n, 2).into_vec();
            genes.swap(picks[0], picks[1]);
        }
        child.chromosome_mut().update_genes(&genes)?;
        Ok(child)
    }
}

/// Edge-exchange mutation for spanning trees: inserts a random unused
/// candidate edge and removes a random edge from the cycle it closes, then
/// re-encodes. A no-op when the candidate graph offers no unused edges
/// (the tree already uses every edge, e.g. on a tree-shaped graph).
#[derive(Debug, Clone)]
pub struct TreeMutation {
    pm: f64,
}

impl TreeMutation {
    pub fn new(pm: f64) -> Result<Self> {
        check_probability("mutation probability", pm)?;
        Ok(Self { pm })
    }
}

impl<I> Mutation<I> for TreeMutation
where
    I: Individual,
    I::Phenotype: SpanningTree,
{
    fn mutate(&self, individual: &I, rng: &mut dyn RngCore) -> Result<I> {
        let mut child = individual.clone();
        if rng.random::<f64>() >= self.pm {
            return Ok(child);
        }
        let mut tree = individual.decode()?;
        let used: HashSet<(usize, usize)> = tree
            .edges()
            .iter()
            .map(|&(u, v)| undirected(u, v))
            .collect();
        let unused: Vec<(usize, usize)> = tree
            .potential_edges()
            .iter()
            .map(|&(u, v)| undirected(u, v))
            .filter(|e| !used.contains(e))
            .collect();
        if unused.is_empty() {
            return Ok(child);
        }

        let (u, v) = unused[rng.random_range(0..unused.len())];
        // The path u..v plus the new edge forms the cycle; drop one of the
        // path's edges at random.
        let path = tree.find_path(u, v);
        if path.len() < 2 {
            return Err(Error::InvalidPhenotype(format!(
                "no path between {u} and {v} in a decoded tree"
            )));
        }
        let drop = rng.random_range(0..path.len() - 1);
        let removed = undirected(path[drop], path[drop + 1]);

        let mut edges: Vec<(usize, usize)> = tree
            .edges()
            .iter()
            .map(|&(a, b)| undirected(a, b))
            .filter(|&e| e != removed)
            .collect();
        edges.push((u, v));
        tree.rebuild(&edges);
        if tree.is_valid() != Some(true) {
            return Err(Error::InvalidPhenotype(
                "edge exchange broke the spanning tree".to_string(),
            ));
        }
        child.encode(&tree)?;
        Ok(child)
    }
}
