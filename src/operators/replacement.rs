//! Survivor replacement operators.

use crate::error::{Error, Result};
use crate::individual::Individual;
use crate::operators::selection::RouletteWheelSelection;
use crate::operators::{Compare, Replacement};
use crate::population::Member;
use rand::RngCore;

/// Elitist truncation: sort the merged pool by the engine's comparator and
/// keep the best `size`. Stable, so equally-ranked members keep their
/// relative order and repeated replacement is idempotent.
#[derive(Debug, Clone, Default)]
pub struct RankReplacement;

impl RankReplacement {
    pub fn new() -> Self {
        Self
    }
}

impl<I: Individual> Replacement<I> for RankReplacement {
    fn replace(
        &self,
        size: usize,
        mut members: Vec<Member<I>>,
        cmp: &Compare<I>,
        presorted: bool,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Member<I>>> {
        if members.len() < size {
            return Err(Error::config(format!(
                "replacement pool holds {} members, need {size}",
                members.len()
            )));
        }
        if !presorted {
            members.sort_by(|a, b| cmp(a, b));
        }
        members.truncate(size);
        Ok(members)
    }
}

/// Stochastic replacement that always keeps the single best member, then
/// fills the remaining slots by unique roulette over the rest of the pool.
/// Trades selection pressure for diversity in single-objective runs.
#[derive(Debug, Clone, Default)]
pub struct RouletteWheelReplacement;

impl RouletteWheelReplacement {
    pub fn new() -> Self {
        Self
    }
}

impl<I: Individual> Replacement<I> for RouletteWheelReplacement {
    fn replace(
        &self,
        size: usize,
        mut members: Vec<Member<I>>,
        cmp: &Compare<I>,
        presorted: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Member<I>>> {
        if members.len() < size {
            return Err(Error::config(format!(
                "replacement pool holds {} members, need {size}",
                members.len()
            )));
        }
        if !presorted {
            members.sort_by(|a, b| cmp(a, b));
        }
        if members.len() == size {
            return Ok(members);
        }
        let mut survivors = Vec::with_capacity(size);
        let rest = members.split_off(1);
        survivors.extend(members); // the elite
        let wheel = RouletteWheelSelection::new(true);
        let mut picked = wheel.spin(size - 1, &rest, rng)?;
        picked.sort_unstable();
        let mut rest: Vec<Option<Member<I>>> = rest.into_iter().map(Some).collect();
        for idx in picked {
            if let Some(member) = rest[idx].take() {
                survivors.push(member);
            }
        }
        Ok(survivors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::BinaryIndividual;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluated_members(objectives: &[f64]) -> Vec<Member<BinaryIndividual>> {
        objectives
            .iter()
            .map(|&o| {
                let mut m = Member::new(BinaryIndividual::new(4).unwrap());
                m.objectives = vec![o];
                m
            })
            .collect()
    }

    fn by_objective(a: &Member<BinaryIndividual>, b: &Member<BinaryIndividual>) -> std::cmp::Ordering {
        a.objective().total_cmp(&b.objective())
    }

    #[test]
    fn test_rank_replacement_keeps_best() {
        let mut rng = StdRng::seed_from_u64(42);
        let members = evaluated_members(&[5.0, 1.0, 3.0, 4.0, 2.0, 6.0]);
        let survivors = RankReplacement::new()
            .replace(3, members, &by_objective, false, &mut rng)
            .unwrap();
        let objectives: Vec<f64> = survivors.iter().map(Member::objective).collect();
        assert_eq!(objectives, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rank_replacement_trusts_presorted() {
        let mut rng = StdRng::seed_from_u64(42);
        // Deliberately unsorted, declared presorted: truncation only.
        let members = evaluated_members(&[5.0, 1.0, 3.0]);
        let survivors = RankReplacement::new()
            .replace(2, members, &by_objective, true, &mut rng)
            .unwrap();
        let objectives: Vec<f64> = survivors.iter().map(Member::objective).collect();
        assert_eq!(objectives, vec![5.0, 1.0]);
    }

    #[test]
    fn test_rank_replacement_pool_too_small() {
        let mut rng = StdRng::seed_from_u64(42);
        let members = evaluated_members(&[1.0, 2.0]);
        assert!(RankReplacement::new()
            .replace(5, members, &by_objective, false, &mut rng)
            .is_err());
    }

    #[test]
    fn test_roulette_replacement_always_keeps_elite() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let members = evaluated_members(&[9.0, 2.0, 7.0, 0.5, 4.0, 8.0]);
            let survivors = RouletteWheelReplacement::new()
                .replace(3, members, &by_objective, false, &mut rng)
                .unwrap();
            assert_eq!(survivors.len(), 3);
            assert!(survivors.iter().any(|m| m.objective() == 0.5));
        }
    }

    #[test]
    fn test_roulette_replacement_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        let members = evaluated_members(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let survivors = RouletteWheelReplacement::new()
            .replace(4, members, &by_objective, false, &mut rng)
            .unwrap();
        let mut objectives: Vec<f64> = survivors.iter().map(Member::objective).collect();
        objectives.sort_by(f64::total_cmp);
        objectives.dedup();
        assert_eq!(objectives.len(), 4);
    }
}
