//! Population container and evaluated-member bookkeeping.
//!
//! [`Member`] wraps an individual together with the engine-derived state the
//! generational loop needs: the signed objective vector and, for
//! multi-objective runs, the non-dominated rank and crowding distance. Rank
//! and crowding are `None` until a sort pass assigns them and are cleared at
//! the start of every sort — they are derived, never persisted.

use crate::error::{Error, Result};
use crate::individual::Individual;
use rand::RngCore;

/// An individual plus its evaluation and sorting annotations.
#[derive(Debug, Clone)]
pub struct Member<I> {
    pub individual: I,
    /// Objective values with sign coefficients already applied
    /// (minimization convention). Empty until evaluated.
    pub objectives: Vec<f64>,
    /// Non-dominated front index, 0 = Pareto front. Assigned by the
    /// engine's sort pass.
    pub rank: Option<usize>,
    /// Crowding distance within the member's front. Assigned with `rank`.
    pub crowding: Option<f64>,
}

impl<I> Member<I> {
    pub fn new(individual: I) -> Self {
        Self {
            individual,
            objectives: Vec::new(),
            rank: None,
            crowding: None,
        }
    }

    /// Scalar objective for single-objective engines.
    ///
    /// # Panics
    /// Panics if the member has not been evaluated.
    pub fn objective(&self) -> f64 {
        self.objectives[0]
    }

    /// Clears rank and crowding before a fresh sort pass.
    pub(crate) fn clear_annotations(&mut self) {
        self.rank = None;
        self.crowding = None;
    }
}

/// Callback that produces a full initial population.
pub type Initializer<I> = Box<dyn FnMut(&mut dyn RngCore) -> Result<Vec<I>>>;

/// A fixed-capacity collection of members plus the template individual used
/// to spawn new ones.
///
/// Capacity is enforced on every insert; exceeding it is a programming
/// error, not a runtime condition, and panics.
pub struct Population<I: Individual> {
    template: I,
    size: usize,
    members: Vec<Member<I>>,
    initializer: Option<Initializer<I>>,
}

impl<I: Individual> Population<I> {
    /// Creates an empty population of fixed capacity `size` around a
    /// template individual.
    pub fn new(template: I, size: usize) -> Result<Self> {
        if size < 2 {
            return Err(Error::config("population size must be at least 2"));
        }
        Ok(Self {
            template,
            size,
            members: Vec::with_capacity(size),
            initializer: None,
        })
    }

    /// Registers a custom initialization callback. It must return exactly
    /// `size` individuals; the engine validates the length on use.
    pub fn set_initializer(&mut self, f: Initializer<I>) {
        self.initializer = Some(f);
    }

    /// Fixed capacity.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current number of members (`<= size`).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The template individual new members are cloned from.
    pub fn template(&self) -> &I {
        &self.template
    }

    pub fn members(&self) -> &[Member<I>] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Member<I>] {
        &mut self.members
    }

    /// Replaces the member list wholesale (post-replacement truncation).
    ///
    /// # Panics
    /// Panics if `members` exceeds the population capacity.
    pub fn replace_members(&mut self, members: Vec<Member<I>>) {
        assert!(
            members.len() <= self.size,
            "population capacity is {}, got {} members",
            self.size,
            members.len()
        );
        self.members = members;
    }

    /// Appends one member.
    ///
    /// # Panics
    /// Panics when the population is already at capacity.
    pub fn push(&mut self, member: Member<I>) {
        assert!(
            self.members.len() < self.size,
            "population capacity is {}, cannot push another member",
            self.size
        );
        self.members.push(member);
    }

    /// Drains the member list, leaving the population empty.
    pub fn take_members(&mut self) -> Vec<Member<I>> {
        std::mem::take(&mut self.members)
    }

    /// Builds the initial member list: either via the registered callback
    /// (validated to return exactly `size` individuals) or by cloning the
    /// template and randomizing its chromosome `size` times.
    pub fn initialize(&mut self, rng: &mut dyn RngCore) -> Result<Vec<Member<I>>> {
        let individuals = match self.initializer.as_mut() {
            Some(f) => {
                let individuals = f(rng)?;
                if individuals.len() != self.size {
                    return Err(Error::InvalidInitialization {
                        expected: self.size,
                        actual: individuals.len(),
                    });
                }
                individuals
            }
            None => {
                let mut individuals = Vec::with_capacity(self.size);
                for _ in 0..self.size {
                    let mut ind = self.template.clone();
                    ind.random_init(rng)?;
                    individuals.push(ind);
                }
                individuals
            }
        };
        Ok(individuals.into_iter().map(Member::new).collect())
    }

    /// Objective vectors of all members, in member order.
    pub fn all_objectives(&self) -> Vec<Vec<f64>> {
        self.members.iter().map(|m| m.objectives.clone()).collect()
    }
}
