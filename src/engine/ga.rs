//! Single-objective generational GA.
//!
//! Same operator slots and lifecycle as the NSGA-II engine, driven by a
//! scalar objective instead of Pareto ranking. The default replacement is
//! elitist, so the best-so-far history never regresses.

use crate::engine::pareto::objective_ascending;
use crate::engine::{EngineState, NoReporter, Objective, Reporter};
use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::{
    Crossover, Mutation, RankReplacement, Replacement, Selection, TournamentSelection,
};
use crate::population::{Member, Population};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration for [`GaEngine`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of generations to run.
    pub max_generations: usize,

    /// Size of the mating pool drawn each generation. Must be even.
    /// `None` uses the population size, rounded up to even.
    pub selection_size: Option<usize>,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            max_generations: 100,
            selection_size: None,
            seed: None,
        }
    }
}

impl GaConfig {
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
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    /// Best individual found.
    pub best: I,

    /// Its objective value in the caller's orientation.
    pub best_objective: f64,

    /// Generations actually run.
    pub generations: usize,

    /// Best objective per generation, caller's orientation. Monotone under
    /// elitist replacement.
    pub objective_history: Vec<f64>,
}

/// Single-objective generational engine.
pub struct GaEngine<I: Individual> {
    config: GaConfig,
    population: Population<I>,
    objective: Option<Objective<I>>,
    selection: Box<dyn Selection<I>>,
    crossover: Box<dyn Crossover<I>>,
    mutation: Box<dyn Mutation<I>>,
    replacement: Box<dyn Replacement<I>>,
    rng: StdRng,
    state: EngineState,
}

impl<I: Individual> GaEngine<I> {
    /// Creates an engine with binary tournament selection and elitist
    /// truncation. The objective is registered separately.
    pub fn new(
        population: Population<I>,
        crossover: Box<dyn Crossover<I>>,
        mutation: Box<dyn Mutation<I>>,
        config: GaConfig,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            config,
            population,
            objective: None,
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

    /// Registers the objective to minimize. Replaces any earlier objective.
    pub fn minimize_objective(&mut self, f: impl Fn(&I) -> f64 + 'static) {
        self.objective = Some(Objective::minimizing(Box::new(f)));
    }

    /// Registers the objective to maximize. Replaces any earlier objective.
    pub fn maximize_objective(&mut self, f: impl Fn(&I) -> f64 + 'static) {
        self.objective = Some(Objective::maximizing(Box::new(f)));
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn population(&self) -> &Population<I> {
        &self.population
    }

    fn evaluate(&self, individual: &I) -> Result<f64> {
        match &self.objective {
            Some(objective) => objective.evaluate(individual),
            None => Err(Error::config("no objective registered")),
        }
    }

    /// Runs the configured number of generations and returns the best
    /// individual found.
    pub fn run(&mut self) -> Result<GaResult<I>> {
        self.run_with(&mut NoReporter)
    }

    /// Runs with a per-generation observer.
    pub fn run_with(&mut self, reporter: &mut dyn Reporter<I>) -> Result<GaResult<I>> {
        if self.state == EngineState::Terminated {
            return Err(Error::config("engine already terminated"));
        }
        if self.objective.is_none() {
            return Err(Error::config("no objective registered"));
        }

        let mut members = self.population.initialize(&mut self.rng)?;
        for member in &mut members {
            member.objectives = vec![self.evaluate(&member.individual)?];
        }
        members.sort_by(objective_ascending);
        self.population.replace_members(members);
        self.state = EngineState::Initialized;

        let size = self.population.size();
        let mating = self
            .config
            .selection_size
            .unwrap_or(size + size % 2);
        let mut history = Vec::with_capacity(self.config.max_generations);
        for generation in 1..=self.config.max_generations {
            let parents = self.selection.select(
                mating,
                self.population.members(),
                &|a, b| objective_ascending(a, b),
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
                    member.objectives = vec![self.evaluate(&member.individual)?];
                    offspring.push(member);
                }
            }

            let mut pool = self.population.take_members();
            pool.extend(offspring);
            let survivors = self.replacement.replace(
                size,
                pool,
                &|a, b| objective_ascending(a, b),
                false,
                &mut self.rng,
            )?;
            self.population.replace_members(survivors);

            let best_signed = self.best_member().objective();
            let value = self
                .objective
                .as_ref()
                .expect("objective presence checked at run start")
                .restore(best_signed);
            history.push(value);
            log::debug!("generation {generation}: best objective {value}");
            reporter.on_generation(generation, self.population.members());
            self.state = EngineState::Generation(generation);
        }
        self.state = EngineState::Terminated;

        let best = self.best_member().clone();
        let best_objective = self
            .objective
            .as_ref()
            .expect("objective presence checked at run start")
            .restore(best.objective());
        Ok(GaResult {
            best: best.individual,
            best_objective,
            generations: self.config.max_generations,
            objective_history: history,
        })
    }

    fn best_member(&self) -> &Member<I> {
        self.population
            .members()
            .iter()
            .min_by(|a, b| objective_ascending(a, b))
            .expect("population is never empty once a run has started")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::BinaryIndividual;
    use crate::operators::{FlipBitMutation, UniformCrossover};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn knapsack_engine(seed: u64, generations: usize) -> GaEngine<BinaryIndividual> {
        // 100 items with seeded weights and values, capacity half the
        // total weight; infeasible solutions take a value-zero penalty.
        let mut data_rng = StdRng::seed_from_u64(1234);
        let weights: Vec<f64> = (0..100).map(|_| data_rng.random_range(1.0..20.0)).collect();
        let values: Vec<f64> = (0..100).map(|_| data_rng.random_range(1.0..30.0)).collect();
        let capacity: f64 = weights.iter().sum::<f64>() / 2.0;

        let template = BinaryIndividual::new(100).unwrap();
        let population = Population::new(template, 100).unwrap();
        let mut engine = GaEngine::new(
            population,
            Box::new(UniformCrossover::new(0.9, 0.5).unwrap()),
            Box::new(FlipBitMutation::with_flip_probability(0.2, 0.05).unwrap()),
            GaConfig::default()
                .with_max_generations(generations)
                .with_seed(seed),
        )
        .unwrap();
        engine.maximize_objective(move |ind: &BinaryIndividual| {
            let picks = ind.decode().unwrap_or_default();
            let weight: f64 = picks
                .iter()
                .zip(&weights)
                .filter(|(&p, _)| p)
                .map(|(_, &w)| w)
                .sum();
            if weight > capacity {
                return 0.0;
            }
            picks
                .iter()
                .zip(&values)
                .filter(|(&p, _)| p)
                .map(|(_, &v)| v)
                .sum()
        });
        engine
    }

    #[test]
    fn test_knapsack_best_history_is_monotone() {
        // RUST_LOG=debug shows the per-generation trace under --nocapture.
        let _ = env_logger::builder().is_test(true).try_init();
        let mut engine = knapsack_engine(42, 100);
        let result = engine.run().unwrap();
        assert_eq!(result.objective_history.len(), 100);
        for window in result.objective_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best regressed from {} to {}",
                window[0],
                window[1]
            );
        }
        assert_eq!(result.best_objective, *result.objective_history.last().unwrap());
        assert!(result.best_objective > 0.0);
    }

    #[test]
    fn test_knapsack_improves_over_random() {
        let mut engine = knapsack_engine(42, 100);
        let result = engine.run().unwrap();
        let first = result.objective_history[0];
        let last = result.best_objective;
        assert!(last > first, "no improvement: {first} -> {last}");
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let a = knapsack_engine(7, 20).run().unwrap();
        let b = knapsack_engine(7, 20).run().unwrap();
        assert_eq!(a.objective_history, b.objective_history);
        assert_eq!(
            a.best.chromosome().genes(),
            b.best.chromosome().genes()
        );
    }

    #[test]
    fn test_run_without_objective_rejected() {
        let template = BinaryIndividual::new(8).unwrap();
        let population = Population::new(template, 10).unwrap();
        let mut engine = GaEngine::new(
            population,
            Box::new(UniformCrossover::new(0.9, 0.5).unwrap()),
            Box::new(FlipBitMutation::with_flip_probability(0.1, 0.05).unwrap()),
            GaConfig::default().with_seed(1),
        )
        .unwrap();
        assert!(engine.run().is_err());
    }

    #[test]
    fn test_minimization_orientation() {
        // Minimize the number of set bits: the optimum is all-zero.
        let template = BinaryIndividual::new(24).unwrap();
        let population = Population::new(template, 40).unwrap();
        let mut engine = GaEngine::new(
            population,
            Box::new(UniformCrossover::new(0.9, 0.5).unwrap()),
            Box::new(FlipBitMutation::with_flip_probability(0.3, 0.05).unwrap()),
            GaConfig::default().with_max_generations(60).with_seed(11),
        )
        .unwrap();
        engine.minimize_objective(|ind: &BinaryIndividual| {
            ind.chromosome().genes().iter().sum::<i64>() as f64
        });
        let result = engine.run().unwrap();
        assert!(result.best_objective <= 2.0, "got {}", result.best_objective);
        for window in result.objective_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }
}
