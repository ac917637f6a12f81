//! Error taxonomy for the evolutionary engine.
//!
//! Every failure in the core is a deterministic function of malformed input
//! or misconfiguration; nothing is retried. Configuration problems surface at
//! construction time, evaluation problems at the generation that triggers
//! them.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the core engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter detected at construction or first use (bad
    /// probability, degenerate gene domain, zero generations, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Tournament selection was asked to sample more competitors than the
    /// population holds.
    #[error("tournament size ({size}) exceeds population size ({population})")]
    TournamentSizeExceedsPopulation { size: usize, population: usize },

    /// A gene vector did not match the chromosome length it was written to.
    #[error("chromosome length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Indexed chromosome access outside `[0, length)`.
    #[error("gene index {index} out of range for chromosome of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// An objective callback returned NaN or an infinite value.
    #[error("objective returned a non-finite value: {value}")]
    InvalidObjective { value: f64 },

    /// A custom initialization callback returned the wrong number of
    /// individuals.
    #[error("initialization returned {actual} individuals, expected {expected}")]
    InvalidInitialization { expected: usize, actual: usize },

    /// An operator required a phenotype shape the decode did not produce
    /// (e.g. a spanning tree that fails its own validity bookkeeping).
    #[error("invalid phenotype: {0}")]
    InvalidPhenotype(String),

    /// Spanning-tree construction exhausted its edge frontier before
    /// covering every vertex: the candidate graph is disconnected.
    #[error("cannot build a spanning tree: candidate graph is not connected")]
    UnconnectedGraph,

    /// The representation has no canonical implementation of the requested
    /// operation (e.g. bias-key encodings are one-directional).
    #[error("{0} is not supported by this representation")]
    NotSupported(&'static str),
}

impl Error {
    /// Shorthand for a [`Error::Configuration`] with a formatted message.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
