//! The genotype/phenotype boundary.
//!
//! An [`Individual`] owns exactly one [`Chromosome`] and knows how to decode
//! it into a problem-meaningful phenotype. `decode` is deterministic and
//! borrows the individual immutably, so the chromosome can never be changed
//! by decoding. `encode` is optional: representations without a canonical
//! inverse mapping return [`Error::NotSupported`].
//!
//! Cloning an individual deep-copies its chromosome — parents and offspring
//! never alias.

use crate::chromosome::{Chromosome, Gene};
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::RngCore;

/// A candidate solution: one chromosome plus a decode/encode contract.
pub trait Individual: Clone {
    /// Gene type of the underlying chromosome.
    type Gene: Gene;

    /// Decoded, problem-meaningful representation.
    type Phenotype;

    /// The owned chromosome.
    fn chromosome(&self) -> &Chromosome<Self::Gene>;

    /// Mutable access for operators. Operators must clamp before writing.
    fn chromosome_mut(&mut self) -> &mut Chromosome<Self::Gene>;

    /// Randomizes the chromosome in place.
    fn random_init(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.chromosome_mut().init_genes(None, rng)
    }

    /// Converts the genotype to a phenotype. Must be deterministic for a
    /// given gene vector and must not mutate the chromosome.
    fn decode(&self) -> Result<Self::Phenotype>;

    /// Writes a phenotype back into the chromosome, when the representation
    /// has a canonical inverse mapping.
    fn encode(&mut self, _phenotype: &Self::Phenotype) -> Result<()> {
        Err(Error::NotSupported("encode"))
    }
}

/// Binary-coded individual: integer genes restricted to `{0, 1}`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryIndividual {
    chromosome: Chromosome<i64>,
}

impl BinaryIndividual {
    pub fn new(length: usize) -> Result<Self> {
        Ok(Self {
            chromosome: Chromosome::uniform(length, 0, 1)?,
        })
    }
}

impl Individual for BinaryIndividual {
    type Gene = i64;
    type Phenotype = Vec<bool>;

    fn chromosome(&self) -> &Chromosome<i64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<i64> {
        &mut self.chromosome
    }

    fn decode(&self) -> Result<Vec<bool>> {
        Ok(self.chromosome.genes().iter().map(|&g| g != 0).collect())
    }

    fn encode(&mut self, phenotype: &Vec<bool>) -> Result<()> {
        let genes: Vec<i64> = phenotype.iter().map(|&b| i64::from(b)).collect();
        self.chromosome.update_genes(&genes)
    }
}

/// Integer-coded individual with a shared or per-gene domain.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntIndividual {
    chromosome: Chromosome<i64>,
}

impl IntIndividual {
    pub fn new(length: usize, lo: i64, hi: i64) -> Result<Self> {
        Ok(Self {
            chromosome: Chromosome::uniform(length, lo, hi)?,
        })
    }

    pub fn with_domains(domains: &[(i64, i64)]) -> Result<Self> {
        Ok(Self {
            chromosome: Chromosome::with_domains(domains)?,
        })
    }
}

impl Individual for IntIndividual {
    type Gene = i64;
    type Phenotype = Vec<i64>;

    fn chromosome(&self) -> &Chromosome<i64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<i64> {
        &mut self.chromosome
    }

    fn decode(&self) -> Result<Vec<i64>> {
        Ok(self.chromosome.genes().to_vec())
    }

    fn encode(&mut self, phenotype: &Vec<i64>) -> Result<()> {
        self.chromosome.update_genes(phenotype)
    }
}

/// Real-coded individual.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatIndividual {
    chromosome: Chromosome<f64>,
}

impl FloatIndividual {
    pub fn new(length: usize, lo: f64, hi: f64) -> Result<Self> {
        Ok(Self {
            chromosome: Chromosome::uniform(length, lo, hi)?,
        })
    }

    pub fn with_domains(domains: &[(f64, f64)]) -> Result<Self> {
        Ok(Self {
            chromosome: Chromosome::with_domains(domains)?,
        })
    }
}

impl Individual for FloatIndividual {
    type Gene = f64;
    type Phenotype = Vec<f64>;

    fn chromosome(&self) -> &Chromosome<f64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<f64> {
        &mut self.chromosome
    }

    fn decode(&self) -> Result<Vec<f64>> {
        Ok(self.chromosome.genes().to_vec())
    }

    fn encode(&mut self, phenotype: &Vec<f64>) -> Result<()> {
        self.chromosome.update_genes(phenotype)
    }
}

/// Permutation of `0..length`, stored as integer genes.
///
/// `random_init` shuffles a full permutation instead of drawing genes
/// independently, so the permutation invariant holds from the start.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermutationIndividual {
    chromosome: Chromosome<i64>,
}

impl PermutationIndividual {
    pub fn new(length: usize) -> Result<Self> {
        if length < 2 {
            return Err(Error::config("permutation length must be at least 2"));
        }
        let mut chromosome = Chromosome::uniform(length, 0, length as i64 - 1)?;
        let identity: Vec<i64> = (0..length as i64).collect();
        chromosome.update_genes(&identity)?;
        Ok(Self { chromosome })
    }
}

impl Individual for PermutationIndividual {
    type Gene = i64;
    type Phenotype = Vec<usize>;

    fn chromosome(&self) -> &Chromosome<i64> {
        &self.chromosome
    }

    fn chromosome_mut(&mut self) -> &mut Chromosome<i64> {
        &mut self.chromosome
    }

    fn random_init(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let mut perm: Vec<i64> = (0..self.chromosome.len() as i64).collect();
        perm.shuffle(rng);
        self.chromosome.update_genes(&perm)
    }

    fn decode(&self) -> Result<Vec<usize>> {
        Ok(self.chromosome.genes().iter().map(|&g| g as usize).collect())
    }

    fn encode(&mut self, phenotype: &Vec<usize>) -> Result<()> {
        let genes: Vec<i64> = phenotype.iter().map(|&v| v as i64).collect();
        self.chromosome.update_genes(&genes)
    }
}
