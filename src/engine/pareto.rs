//! Pareto machinery for multi-objective runs.
//!
//! All objectives are **minimized**: lower values are better. Maximization
//! is handled upstream by the engine's sign coefficients.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II", IEEE Transactions on Evolutionary Computation,
//!   6(2), 182-197

use crate::individual::Individual;
use crate::population::Member;
use std::cmp::Ordering;

/// True when `a` Pareto-dominates `b`: no worse in every objective and
/// strictly better in at least one.
///
/// # Example
///
/// ```
/// use evogen::engine::pareto::dominates;
///
/// assert!(dominates(&[1.0, 2.0], &[2.0, 2.0]));
/// assert!(!dominates(&[1.0, 5.0], &[5.0, 1.0])); // trade-off
/// assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0])); // equal
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va > vb {
            return false;
        }
        if va < vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Result of fast non-dominated sorting.
#[derive(Debug, Clone)]
pub struct SortedFronts {
    /// Pareto rank per solution; 0 is the Pareto front.
    pub ranks: Vec<usize>,

    /// Solution indices grouped by front, best front first.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting (Deb et al., 2002).
///
/// Computes pairwise domination counts, peels off the mutually
/// non-dominated front, and repeats. O(m · n²) for n solutions and m
/// objectives.
///
/// # Panics
///
/// Panics when `objectives` is empty or the inner vectors disagree in
/// length.
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> SortedFronts {
    let n = objectives.len();
    assert!(n > 0, "objectives must not be empty");
    let m = objectives[0].len();
    assert!(m > 0, "each solution needs at least one objective");
    debug_assert!(objectives.iter().all(|o| o.len() == m));

    let mut domination_count = vec![0usize; n];
    let mut dominated: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut first_front = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if dominates(&objectives[i], &objectives[j]) {
                dominated[i].push(j);
                domination_count[j] += 1;
            } else if dominates(&objectives[j], &objectives[i]) {
                dominated[j].push(i);
                domination_count[i] += 1;
            }
        }
        if domination_count[i] == 0 {
            first_front.push(i);
        }
    }

    let mut fronts = vec![first_front];
    loop {
        let mut next = Vec::new();
        let current = fronts.last().expect("seeded with the first front");
        for &i in current {
            for &j in &dominated[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next.push(j);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        fronts.push(next);
    }

    SortedFronts { ranks, fronts }
}

/// Crowding distance assignment (Deb et al., 2002).
///
/// Call per front. Boundary solutions of every objective get
/// `f64::INFINITY`; interior solutions accumulate the normalized gap to
/// their sorted neighbors. Objectives with zero range contribute nothing.
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }
    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    for obj in 0..m {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            objectives[a][obj]
                .partial_cmp(&objectives[b][obj])
                .unwrap_or(Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = objectives[order[n - 1]][obj] - objectives[order[0]][obj];
        if range > 0.0 {
            for i in 1..(n - 1) {
                let gap = objectives[order[i + 1]][obj] - objectives[order[i - 1]][obj];
                distances[order[i]] += gap / range;
            }
        }
    }
    distances
}

/// Crowded-comparison operator: lower rank wins; within a rank, larger
/// crowding distance wins. Members must carry both annotations.
pub fn crowded_compare<I>(a: &Member<I>, b: &Member<I>) -> Ordering {
    let (ra, rb) = (a.rank.unwrap_or(usize::MAX), b.rank.unwrap_or(usize::MAX));
    match ra.cmp(&rb) {
        Ordering::Equal => {
            let (ca, cb) = (
                a.crowding.unwrap_or(f64::NEG_INFINITY),
                b.crowding.unwrap_or(f64::NEG_INFINITY),
            );
            cb.partial_cmp(&ca).unwrap_or(Ordering::Equal)
        }
        other => other,
    }
}

/// Scalar minimization comparator for single-objective engines.
pub fn objective_ascending<I>(a: &Member<I>, b: &Member<I>) -> Ordering {
    a.objective().total_cmp(&b.objective())
}

/// Annotates every member with its rank and crowding distance and returns
/// the pool reordered by [`crowded_compare`] (front by front, most crowded
/// last within each front).
pub(crate) fn assign_and_order<I: Individual>(members: Vec<Member<I>>) -> Vec<Member<I>> {
    let objectives: Vec<Vec<f64>> = members.iter().map(|m| m.objectives.clone()).collect();
    let sorted = non_dominated_sort(&objectives);

    let mut slots: Vec<Option<Member<I>>> = members.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for (rank, front) in sorted.fronts.iter().enumerate() {
        let front_objectives: Vec<Vec<f64>> =
            front.iter().map(|&i| objectives[i].clone()).collect();
        let distances = crowding_distance(&front_objectives);

        let mut annotated: Vec<Member<I>> = front
            .iter()
            .zip(&distances)
            .map(|(&i, &d)| {
                let mut member = slots[i].take().expect("front indices are disjoint");
                member.clear_annotations();
                member.rank = Some(rank);
                member.crowding = Some(d);
                member
            })
            .collect();
        annotated.sort_by(crowded_compare);
        ordered.extend(annotated);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::BinaryIndividual;

    fn members(objectives: &[Vec<f64>]) -> Vec<Member<BinaryIndividual>> {
        objectives
            .iter()
            .map(|o| {
                let mut m = Member::new(BinaryIndividual::new(4).unwrap());
                m.objectives = o.clone();
                m
            })
            .collect()
    }

    #[test]
    fn test_dominates_basic() {
        assert!(dominates(&[1.0, 1.0], &[1.0, 2.0]));
        assert!(!dominates(&[1.0, 2.0], &[1.0, 1.0]));
        assert!(!dominates(&[1.0], &[1.0]));
    }

    #[test]
    fn test_sort_peels_fronts() {
        let objectives = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![5.0, 1.0],
            vec![4.0, 4.0], // dominated by (3, 3)
            vec![6.0, 6.0], // dominated by everything
        ];
        let sorted = non_dominated_sort(&objectives);
        assert_eq!(sorted.ranks, vec![0, 0, 0, 1, 2]);
        assert_eq!(sorted.fronts.len(), 3);
        assert_eq!(sorted.fronts[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_all_non_dominated() {
        let objectives = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![3.0, 2.0], vec![4.0, 1.0]];
        let sorted = non_dominated_sort(&objectives);
        assert!(sorted.ranks.iter().all(|&r| r == 0));
        assert_eq!(sorted.fronts.len(), 1);
    }

    #[test]
    fn test_crowding_boundaries_infinite() {
        let objectives = vec![vec![1.0, 5.0], vec![3.0, 3.0], vec![5.0, 1.0]];
        let d = crowding_distance(&objectives);
        assert!(d[0].is_infinite());
        assert!(d[2].is_infinite());
        assert!(d[1].is_finite());
    }

    #[test]
    fn test_crowding_zero_range_objective_ignored() {
        // Second objective is constant; only the first contributes.
        let objectives = vec![
            vec![0.0, 7.0],
            vec![1.0, 7.0],
            vec![4.0, 7.0],
            vec![8.0, 7.0],
        ];
        let d = crowding_distance(&objectives);
        assert!(d[0].is_infinite());
        assert!(d[3].is_infinite());
        assert!((d[1] - 0.5).abs() < 1e-12);
        assert!((d[2] - 7.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_tiny_front() {
        assert!(crowding_distance(&[vec![1.0], vec![2.0]])
            .iter()
            .all(|d| d.is_infinite()));
    }

    #[test]
    fn test_assign_and_order_rank_then_crowding() {
        let pool = members(&[
            vec![4.0, 4.0], // rank 1
            vec![1.0, 5.0], // rank 0, boundary
            vec![3.0, 3.0], // rank 0, interior
            vec![5.0, 1.0], // rank 0, boundary
        ]);
        let ordered = assign_and_order(pool);
        assert_eq!(ordered[3].rank, Some(1));
        let front: Vec<usize> = ordered[..3].iter().map(|m| m.rank.unwrap()).collect();
        assert_eq!(front, vec![0, 0, 0]);
        // Interior solution sorts after the infinite-crowding boundaries.
        assert!(ordered[2].crowding.unwrap().is_finite());
        assert!(ordered[0].crowding.unwrap().is_infinite());
    }

    #[test]
    fn test_sort_is_idempotent() {
        let objectives = vec![
            vec![1.0, 5.0],
            vec![3.0, 3.0],
            vec![4.0, 4.0],
            vec![2.0, 6.0],
            vec![6.0, 2.0],
        ];
        let first = non_dominated_sort(&objectives);
        let second = non_dominated_sort(&objectives);
        assert_eq!(first.ranks, second.ranks);
        assert_eq!(first.fronts, second.fronts);

        // Reordering an already-ordered pool changes nothing either.
        let once = assign_and_order(members(&objectives));
        let annotations: Vec<(Option<usize>, Option<f64>)> =
            once.iter().map(|m| (m.rank, m.crowding)).collect();
        let twice = assign_and_order(once);
        let again: Vec<(Option<usize>, Option<f64>)> =
            twice.iter().map(|m| (m.rank, m.crowding)).collect();
        assert_eq!(annotations, again);
    }

    #[test]
    fn test_crowded_compare_prefers_low_rank() {
        let pool = members(&[vec![1.0, 1.0], vec![0.5, 0.5]]);
        let mut a = pool[0].clone();
        let mut b = pool[1].clone();
        a.rank = Some(0);
        a.crowding = Some(0.1);
        b.rank = Some(2);
        b.crowding = Some(f64::INFINITY);
        assert_eq!(crowded_compare(&a, &b), Ordering::Less);
    }
}
