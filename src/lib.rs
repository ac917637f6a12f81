//! Evolutionary optimization framework with first-class multi-objective
//! and tree-genotype support.
//!
//! The crate is organized in three layers:
//!
//! - **Representation**: [`chromosome::Chromosome`] (bounded gene vectors),
//!   the [`individual::Individual`] decode/encode contract, and the ready
//!   binary/integer/real/permutation individuals.
//! - **Operators**: pluggable [`operators::Selection`],
//!   [`operators::Crossover`], [`operators::Mutation`] and
//!   [`operators::Replacement`] implementations, all driven by an
//!   engine-supplied comparator so the same operator serves single- and
//!   multi-objective runs.
//! - **Engines**: [`engine::Nsga2Engine`] (NSGA-II: non-dominated sorting,
//!   crowding distance, elitist truncation) and the single-objective
//!   [`engine::GaEngine`].
//!
//! The [`tree`] module adds genotypes for network design problems:
//! spanning trees built Kruskal- or Prim-style over an arbitrary candidate
//! graph, encoded as Prüfer sequences or network random keys.
//!
//! All objectives are evaluated as minimization internally; maximization
//! objectives are registered with [`engine::Nsga2Engine::maximize_objective`]
//! and reported back in the caller's orientation.
//!
//! # Example
//!
//! ```
//! use evogen::engine::{Nsga2Config, Nsga2Engine};
//! use evogen::individual::{FloatIndividual, Individual};
//! use evogen::operators::{PolynomialMutation, SbxCrossover};
//! use evogen::population::Population;
//!
//! // Minimize x and (1 - x) simultaneously over x in [0, 1].
//! let template = FloatIndividual::new(1, 0.0, 1.0)?;
//! let population = Population::new(template, 20)?;
//! let mut engine = Nsga2Engine::new(
//!     population,
//!     Box::new(SbxCrossover::new(0.9, 15.0)?),
//!     Box::new(PolynomialMutation::new(0.1, 20.0)?),
//!     Nsga2Config::default().with_max_generations(50).with_seed(42),
//! )?;
//! engine.minimize_objective(|ind: &FloatIndividual| ind.chromosome().genes()[0]);
//! engine.minimize_objective(|ind: &FloatIndividual| 1.0 - ind.chromosome().genes()[0]);
//! engine.run()?;
//! assert!(!engine.front_objectives().is_empty());
//! # Ok::<(), evogen::error::Error>(())
//! ```

pub mod chromosome;
pub mod engine;
pub mod error;
pub mod individual;
pub mod operators;
pub mod population;
pub mod tree;

pub use chromosome::{Chromosome, Gene};
pub use engine::{EngineState, GaConfig, GaEngine, GaResult, Nsga2Config, Nsga2Engine, Reporter};
pub use error::{Error, Result};
pub use individual::{
    BinaryIndividual, FloatIndividual, Individual, IntIndividual, PermutationIndividual,
};
pub use population::{Member, Population};
