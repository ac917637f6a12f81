//! Parent selection operators.

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::{Compare, Selection};
use crate::population::Member;
use rand::seq::{index, SliceRandom};
use rand::{Rng, RngCore};

/// k-way tournament with a geometric winner distribution.
///
/// Each pick draws `size` distinct competitors, sorts them by the engine's
/// comparator and takes the i-th best with probability `p · (1 − p)^i`.
/// `p = 1.0` is the usual deterministic tournament.
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    size: usize,
    p: f64,
}

impl TournamentSelection {
    pub fn new(size: usize, p: f64) -> Result<Self> {
        if size < 2 {
            return Err(Error::config("tournament size must be at least 2"));
        }
        if !(0.0..=1.0).contains(&p) || p == 0.0 {
            return Err(Error::config(format!(
                "tournament win probability must be in (0, 1], got {p}"
            )));
        }
        Ok(Self { size, p })
    }
}

impl<I: Individual> Selection<I> for TournamentSelection {
    fn select(
        &self,
        count: usize,
        members: &[Member<I>],
        cmp: &Compare<I>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>> {
        if self.size > members.len() {
            return Err(Error::TournamentSizeExceedsPopulation {
                size: self.size,
                population: members.len(),
            });
        }
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let mut competitors: Vec<usize> =
                index::sample(rng, members.len(), self.size).into_vec();
            // Shuffle before the stable sort so exact ties break uniformly
            // instead of in sample order.
            competitors.shuffle(rng);
            competitors.sort_by(|&a, &b| cmp(&members[a], &members[b]));

            let r: f64 = rng.random();
            let mut cumulative = 0.0;
            let mut winner = None;
            for (i, &idx) in competitors.iter().enumerate() {
                cumulative += self.p * (1.0 - self.p).powi(i as i32);
                if r < cumulative {
                    winner = Some(idx);
                    break;
                }
            }
            // The geometric weights do not quite sum to 1 for p < 1;
            // fall back to a uniform competitor when the draw lands in
            // the residual mass.
            let winner = match winner {
                Some(idx) => idx,
                None => competitors[rng.random_range(0..competitors.len())],
            };
            picked.push(winner);
        }
        Ok(picked)
    }
}

/// Fitness-proportionate selection for single-objective minimization.
///
/// Weights are `(worst − objective) + 1`, so the best member gets the
/// largest slice and every member keeps a nonzero one. With `unique`
/// enabled an already-chosen winner degrades to the nearest unchosen
/// member, scanning backward through the wheel and wrapping.
#[derive(Debug, Clone)]
pub struct RouletteWheelSelection {
    unique: bool,
}

impl RouletteWheelSelection {
    pub fn new(unique: bool) -> Self {
        Self { unique }
    }

    pub(crate) fn spin<I: Individual>(
        &self,
        count: usize,
        members: &[Member<I>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>> {
        if members.is_empty() {
            return Err(Error::config("cannot select from an empty pool"));
        }
        if self.unique && count > members.len() {
            return Err(Error::config(format!(
                "unique roulette selection of {count} from a pool of {}",
                members.len()
            )));
        }
        let worst = members
            .iter()
            .map(Member::objective)
            .fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = members
            .iter()
            .map(|m| worst - m.objective() + 1.0)
            .collect();
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for w in &weights {
            total += w;
            cumulative.push(total);
        }

        let mut chosen = vec![false; members.len()];
        let mut picked = Vec::with_capacity(count);
        for _ in 0..count {
            let r = rng.random_range(0.0..total);
            let mut idx = cumulative.partition_point(|&c| c <= r);
            if idx >= members.len() {
                idx = members.len() - 1;
            }
            if self.unique && chosen[idx] {
                // Backward cyclic scan to the nearest free slot.
                let n = members.len();
                for step in 1..n {
                    let candidate = (idx + n - step) % n;
                    if !chosen[candidate] {
                        idx = candidate;
                        break;
                    }
                }
            }
            chosen[idx] = true;
            picked.push(idx);
        }
        Ok(picked)
    }
}

impl<I: Individual> Selection<I> for RouletteWheelSelection {
    fn select(
        &self,
        count: usize,
        members: &[Member<I>],
        _cmp: &Compare<I>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>> {
        self.spin(count, members, rng)
    }
}
