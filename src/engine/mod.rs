//! Evolutionary engines.
//!
//! [`nsga2::Nsga2Engine`] drives multi-objective runs with Pareto ranking
//! and crowding; [`ga::GaEngine`] is the single-objective counterpart.
//! Both share the same lifecycle, operator slots and objective handling.

pub mod ga;
pub mod nsga2;
pub mod pareto;

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::population::Member;

pub use ga::{GaConfig, GaEngine, GaResult};
pub use nsga2::{Nsga2Config, Nsga2Engine};

/// Lifecycle of an engine. Transitions are one-way; a terminated engine
/// cannot be re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, population not yet initialized.
    Uninitialized,
    /// Initial population built and evaluated.
    Initialized,
    /// Mid-run, holding the number of completed generations.
    Generation(usize),
    /// Run finished; results are frozen.
    Terminated,
}

/// One registered objective.
///
/// Objectives are stored in minimization form: a maximization objective
/// carries coefficient `-1.0` and its raw value is negated before ranking.
/// `restore` undoes the sign for user-facing results.
pub struct Objective<I> {
    f: Box<dyn Fn(&I) -> f64>,
    coefficient: f64,
}

impl<I> Objective<I> {
    pub(crate) fn minimizing(f: Box<dyn Fn(&I) -> f64>) -> Self {
        Self { f, coefficient: 1.0 }
    }

    pub(crate) fn maximizing(f: Box<dyn Fn(&I) -> f64>) -> Self {
        Self { f, coefficient: -1.0 }
    }

    /// Signed (internal, minimization-form) value. Non-finite raw values
    /// are rejected.
    pub(crate) fn evaluate(&self, individual: &I) -> Result<f64> {
        let value = (self.f)(individual);
        if !value.is_finite() {
            return Err(Error::InvalidObjective { value });
        }
        Ok(value * self.coefficient)
    }

    /// Maps a signed value back to the caller's orientation.
    pub(crate) fn restore(&self, signed: f64) -> f64 {
        signed * self.coefficient
    }
}

impl<I> std::fmt::Debug for Objective<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Objective")
            .field("coefficient", &self.coefficient)
            .finish_non_exhaustive()
    }
}

/// Per-generation observer. The member slice is the surviving population
/// after replacement, already ordered best-first.
pub trait Reporter<I: Individual> {
    fn on_generation(&mut self, _generation: usize, _members: &[Member<I>]) {}
}

/// Reporter that ignores everything; used by the plain `run()` entry
/// points.
pub(crate) struct NoReporter;

impl<I: Individual> Reporter<I> for NoReporter {}
