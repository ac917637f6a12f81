//! Pluggable genetic operators.
//!
//! Engines hold operators behind trait objects, so every trait here is
//! object-safe and takes its randomness as `&mut dyn RngCore`. Selection and
//! replacement never hard-code a fitness notion: the engine passes in the
//! comparator ("less is better") that matches its objective setup, which is
//! what lets the same operators serve single- and multi-objective runs.

pub mod crossover;
pub mod mutation;
pub mod replacement;
pub mod selection;

use crate::error::Result;
use crate::individual::Individual;
use crate::population::Member;
use rand::RngCore;
use std::cmp::Ordering;

pub use crossover::{
    KruskalCrossover, OrderCrossover, PointCrossover, PrimCrossover, SbxCrossover,
    UniformCrossover,
};
pub use mutation::{FlipBitMutation, PolynomialMutation, SwapMutation, TreeMutation};
pub use replacement::{RankReplacement, RouletteWheelReplacement};
pub use selection::{RouletteWheelSelection, TournamentSelection};

/// Member ordering supplied by the engine. `Ordering::Less` means the first
/// argument is the better member.
pub type Compare<I> = dyn Fn(&Member<I>, &Member<I>) -> Ordering;

/// Picks `count` members (by index, repetition allowed) to act as parents.
pub trait Selection<I: Individual> {
    fn select(
        &self,
        count: usize,
        members: &[Member<I>],
        cmp: &Compare<I>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>>;
}

/// Recombines two parents into two offspring. Parents are borrowed
/// immutably; offspring are fresh deep copies.
pub trait Crossover<I: Individual> {
    fn cross(&self, father: &I, mother: &I, rng: &mut dyn RngCore) -> Result<(I, I)>;
}

/// Perturbs one individual into a new one, leaving the input untouched.
pub trait Mutation<I: Individual> {
    fn mutate(&self, individual: &I, rng: &mut dyn RngCore) -> Result<I>;
}

/// Truncates a merged parent+offspring pool back to `size` survivors.
///
/// `presorted` tells the operator the pool already arrives ordered by `cmp`
/// (the NSGA-II engine sorts during rank assignment), so a second sort can
/// be skipped.
pub trait Replacement<I: Individual> {
    fn replace(
        &self,
        size: usize,
        members: Vec<Member<I>>,
        cmp: &Compare<I>,
        presorted: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Member<I>>>;
}
