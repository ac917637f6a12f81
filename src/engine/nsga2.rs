//! NSGA-II: elitist multi-objective optimization with Pareto ranking and
//! crowding-distance diversity preservation (Deb et al., 2002).

use crate::engine::pareto::{assign_and_order, crowded_compare};
use crate::engine::{EngineState, NoReporter, Objective, Reporter};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::{
    Crossover, Mutation, RankReplacement, Replacement, Selection, TournamentSelection,
};
use crate::population::{Member, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for [`Nsga2Engine`].
///
/// # Builder Pattern
///
/// ```
/// use evogen::engine::Nsga2Config;
///
/// let config = Nsga2Config::default()
///     .with_max_generations(300)
///     .with_selection_size(60)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nsga2Config {
    /// Number of generations to run.
    pub max_generations: usize,

    /// Size of the mating pool drawn each generation. Must be even, since
    /// parents recombine pairwise. `None` uses the population size, rounded
    /// up to even.
    pub selection_size: Option<usize>,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            max_generations: 100,
            selection_size: None,
            seed: None,
        }
    }
}

impl Nsga2Config {
    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mating pool size (must be even).
    pub fn with_selection_size(mut self, n: usize) -> Self {
        self.selection_size = Some(n);
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(Error::config("max_generations must be at least 1"));
        }
        if let Some(size) = self.selection_size {
            if size < 2 || size % 2 != 0 {
                return Err(Error::config(format!(
                    "selection size must be even and at least 2, got {size}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn mating_pool_size(&self, population_size: usize) -> usize {
        self.selection_size
            .unwrap_or(population_size + population_size % 2)
    }

    pub(crate) fn build_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }
}

/// Elitist multi-objective engine.
///
/// Each generation: draw an even mating pool under crowded-tournament
/// pressure, recombine consecutive mates, mutate both children, evaluate,
/// merge parents and offspring, re-rank the merged pool, and truncate back
/// to the population size.
pub struct Nsga2Engine<I: Individual> {
    config: Nsga2Config,
    population: Population<I>,
    objectives: Vec<Objective<I>>,
    selection: Box<dyn Selection<I>>,
    crossover: Box<dyn Crossover<I>>,
    mutation: Box<dyn Mutation<I>>,
    replacement: Box<dyn Replacement<I>>,
    rng: StdRng,
    state: EngineState,
}

impl<I: Individual> Nsga2Engine<I> {
    /// Creates an engine with the default binary crowded tournament and
    /// elitist rank truncation. Objectives are registered separately.
    pub fn new(
        population: Population<I>,
        crossover: Box<dyn Crossover<I>>,
        mutation: Box<dyn Mutation<I>>,
        config: Nsga2Config,
    ) -> Result<Self> {
        config.validate()?;
        let rng = config.build_rng();
        Ok(Self {
            config,
            population,
            objectives: Vec::new(),
            selection: Box::new(TournamentSelection::new(2, 1.0)?),
            crossover,
            mutation,
            replacement: Box::new(RankReplacement::new()),
            rng,
            state: EngineState::Uninitialized,
        })
    }

    /// Replaces the selection operator.
    pub fn with_selection(mut self, selection: Box<dyn Selection<I>>) -> Self {
        self.selection = selection;
        self
    }

    /// Replaces the replacement operator.
    pub fn with_replacement(mut self, replacement: Box<dyn Replacement<I>>) -> Self {
        self.replacement = replacement;
        self
    }

    /// Registers an objective to minimize.
    pub fn minimize_objective(&mut self, f: impl Fn(&I) -> f64 + 'static) {
        self.objectives.push(Objective::minimizing(Box::new(f)));
    }

    /// Registers an objective to maximize.
    pub fn maximize_objective(&mut self, f: impl Fn(&I) -> f64 + 'static) {
        self.objectives.push(Objective::maximizing(Box::new(f)));
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn population(&self) -> &Population<I> {
        &self.population
    }

    fn evaluate(&self, individual: &I) -> Result<Vec<f64>> {
        self.objectives
            .iter()
            .map(|o| o.evaluate(individual))
            .collect()
    }

    /// Runs the configured number of generations.
    pub fn run(&mut self) -> Result<()> {
        self.run_with(&mut NoReporter)
    }

    /// Runs with a per-generation observer.
    pub fn run_with(&mut self, reporter: &mut dyn Reporter<I>) -> Result<()> {
        if self.state == EngineState::Terminated {
            return Err(Error::config("engine already terminated"));
        }
        if self.objectives.is_empty() {
            return Err(Error::config("no objectives registered"));
        }

        let mut members = self.population.initialize(&mut self.rng)?;
        for member in &mut members {
            member.objectives = self.evaluate(&member.individual)?;
        }
        let members = assign_and_order(members);
        self.population.replace_members(members);
        self.state = EngineState::Initialized;

        let size = self.population.size();
        let mating = self.config.mating_pool_size(size);
        for generation in 1..=self.config.max_generations {
            let parents = self.selection.select(
                mating,
                self.population.members(),
                &|a, b| crowded_compare(a, b),
                &mut self.rng,
            )?;

            let mut offspring = Vec::with_capacity(mating);
            for pair in parents.chunks_exact(2) {
                let father = &self.population.members()[pair[0]].individual;
                let mother = &self.population.members()[pair[1]].individual;
                let (c1, c2) = self.crossover.cross(father, mother, &mut self.rng)?;
                for child in [c1, c2] {
                    let child = self.mutation.mutate(&child, &mut self.rng)?;
                    let mut member = Member::new(child);
                    member.objectives = self.evaluate(&member.individual)?;
                    offspring.push(member);
                }
            }

            let mut pool = self.population.take_members();
            pool.extend(offspring);
            let ordered = assign_and_order(pool);
            let survivors = self.replacement.replace(
                size,
                ordered,
                &|a, b| crowded_compare(a, b),
                true,
                &mut self.rng,
            )?;
            self.population.replace_members(survivors);

            log::debug!(
                "generation {generation}: pareto front holds {} of {} members",
                self.pareto_front().len(),
                self.population.len()
            );
            reporter.on_generation(generation, self.population.members());
            self.state = EngineState::Generation(generation);
        }
        self.state = EngineState::Terminated;
        Ok(())
    }

    /// Rank-0 members of the current population.
    pub fn pareto_front(&self) -> Vec<&Member<I>> {
        self.population
            .members()
            .iter()
            .filter(|m| m.rank == Some(0))
            .collect()
    }

    /// Objective vectors of the Pareto front in the caller's orientation
    /// (maximized objectives reported as maximized).
    pub fn front_objectives(&self) -> Vec<Vec<f64>> {
        self.pareto_front()
            .iter()
            .map(|m| {
                m.objectives
                    .iter()
                    .zip(&self.objectives)
                    .map(|(&v, o)| o.restore(v))
                    .collect()
            })
            .collect()
    }
}
