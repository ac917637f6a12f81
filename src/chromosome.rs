//! Fixed-length gene vectors with per-gene domains.
//!
//! A [`Chromosome`] is the encoded representation every operator manipulates:
//! a flat vector of numeric genes, each constrained to a closed domain
//! `[lower_bound[i], upper_bound[i]]`. Operators are required to clamp back
//! into the domain after perturbing genes; the chromosome itself only
//! enforces bounds on random initialization.

use crate::error::{Error, Result};
use rand::{Rng, RngCore};

/// A numeric gene type that can be drawn uniformly from a closed domain.
///
/// Implemented for `i64` (inclusive integer draw) and `f64` (continuous
/// draw). Lower fitness conventions, clamping and comparison all go through
/// `PartialOrd`.
pub trait Gene: Copy + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    /// Draws a value uniformly from `[lo, hi]`.
    fn sample<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self;

    /// Clamps `value` into `[lo, hi]`.
    fn clamp_to(value: Self, lo: Self, hi: Self) -> Self {
        if value < lo {
            lo
        } else if value > hi {
            hi
        } else {
            value
        }
    }
}

impl Gene for i64 {
    fn sample<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
        rng.random_range(lo..=hi)
    }
}

impl Gene for f64 {
    fn sample<R: Rng + ?Sized>(lo: Self, hi: Self, rng: &mut R) -> Self {
        if lo == hi {
            lo
        } else {
            rng.random_range(lo..hi)
        }
    }
}

/// A fixed-length vector of genes with per-gene bounds.
///
/// Invariant after any operator runs: `lower_bound[i] <= genes[i] <=
/// upper_bound[i]` for all `i`. Operators that perturb genes are responsible
/// for clamping before writing back via [`Chromosome::update_genes`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome<G: Gene> {
    lower: Vec<G>,
    upper: Vec<G>,
    genes: Vec<G>,
}

impl<G: Gene> Chromosome<G> {
    /// Creates a chromosome whose every gene shares the domain `[lo, hi]`.
    ///
    /// Genes start at `lo`; call [`init_genes`](Self::init_genes) to
    /// randomize.
    pub fn uniform(length: usize, lo: G, hi: G) -> Result<Self> {
        if length == 0 {
            return Err(Error::config("chromosome length must be at least 1"));
        }
        if !(lo < hi) {
            return Err(Error::config(format!(
                "invalid gene domain: lower bound {lo:?} must be less than upper bound {hi:?}"
            )));
        }
        Ok(Self {
            lower: vec![lo; length],
            upper: vec![hi; length],
            genes: vec![lo; length],
        })
    }

    /// Creates a chromosome with an explicit domain per gene.
    pub fn with_domains(domains: &[(G, G)]) -> Result<Self> {
        if domains.is_empty() {
            return Err(Error::config("chromosome length must be at least 1"));
        }
        for (i, &(lo, hi)) in domains.iter().enumerate() {
            if !(lo < hi) {
                return Err(Error::config(format!(
                    "invalid domain for gene {i}: {lo:?} must be less than {hi:?}"
                )));
            }
        }
        Ok(Self {
            lower: domains.iter().map(|d| d.0).collect(),
            upper: domains.iter().map(|d| d.1).collect(),
            genes: domains.iter().map(|d| d.0).collect(),
        })
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// True when the chromosome holds no genes. Construction forbids this;
    /// present for completeness.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Read-only view of the gene vector.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Per-gene lower bounds.
    pub fn lower_bounds(&self) -> &[G] {
        &self.lower
    }

    /// Per-gene upper bounds.
    pub fn upper_bounds(&self) -> &[G] {
        &self.upper
    }

    /// Gene at `index`, or `IndexOutOfRange`.
    pub fn get(&self, index: usize) -> Result<G> {
        self.genes.get(index).copied().ok_or(Error::IndexOutOfRange {
            index,
            length: self.genes.len(),
        })
    }

    /// Overwrites the gene at `index` without bound-checking the value.
    pub fn set(&mut self, index: usize, value: G) -> Result<()> {
        let length = self.genes.len();
        match self.genes.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange { index, length }),
        }
    }

    /// Genes from `index` to the end.
    pub fn suffix(&self, index: usize) -> &[G] {
        &self.genes[index.min(self.genes.len())..]
    }

    /// Genes before `index`.
    pub fn prefix(&self, index: usize) -> &[G] {
        &self.genes[..index.min(self.genes.len())]
    }

    /// Initializes genes either from explicit `values` (which must match the
    /// chromosome length) or, when `None`, by an independent uniform draw
    /// from each gene's domain.
    pub fn init_genes(&mut self, values: Option<&[G]>, rng: &mut dyn RngCore) -> Result<()> {
        match values {
            Some(values) => self.update_genes(values),
            None => {
                for i in 0..self.genes.len() {
                    self.genes[i] = G::sample(self.lower[i], self.upper[i], rng);
                }
                Ok(())
            }
        }
    }

    /// Overwrites all genes. Length-checked, but values are *not* clamped:
    /// callers must clamp before writing back.
    pub fn update_genes(&mut self, values: &[G]) -> Result<()> {
        if values.len() != self.genes.len() {
            return Err(Error::LengthMismatch {
                expected: self.genes.len(),
                actual: values.len(),
            });
        }
        self.genes.copy_from_slice(values);
        Ok(())
    }

    /// Clamps `value` into the domain of gene `index`.
    pub fn clamp(&self, index: usize, value: G) -> G {
        G::clamp_to(value, self.lower[index], self.upper[index])
    }
}
