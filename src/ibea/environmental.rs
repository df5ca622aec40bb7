//! Environmental selection: iterative worst-removal truncation.
//!
//! Starting from a fitness-assigned working set, the member with the lowest
//! fitness is removed one at a time. After each removal the removed
//! member's contribution is added back to every survivor:
//!
//! ```text
//! fitness(y) += exp(-I(removed, y) / (c · kappa))
//! ```
//!
//! so the survivors' fitness always equals a fresh assignment over the
//! survivors under the same scale `c`. Each removal costs O(n); truncating
//! from `m` to `k` costs O(m · (m - k)).

use super::fitness::{assign_fitness, IndicatorFitness};
use super::indicator::Indicator;
use super::types::Solution;
use crate::error::{IbeaError, SelectionError};
use log::trace;
use std::cmp::Ordering;

/// Truncates a fitness-assigned working set to `target` members.
///
/// `table` must have been computed from `population` in its current order,
/// and every member must carry a `fitness` attribute. Survivors keep their
/// relative order and carry corrected fitness values.
///
/// Ties for the lowest fitness are broken by position: the earliest member
/// is removed first.
///
/// # Errors
///
/// - [`IbeaError::TruncationTarget`] if `target > population.len()`
/// - [`IbeaError::Configuration`] if `table` does not match `population`
/// - [`SelectionError::MissingFitness`] if a member has no fitness
pub fn truncate(
    population: Vec<Solution>,
    table: &IndicatorFitness,
    target: usize,
) -> Result<Vec<Solution>, IbeaError> {
    let m = population.len();
    if target > m {
        return Err(IbeaError::TruncationTarget {
            target,
            available: m,
        });
    }
    if table.len() != m {
        return Err(IbeaError::Configuration(format!(
            "indicator table covers {} solutions, working set has {m}",
            table.len()
        )));
    }

    let mut fitness = population
        .iter()
        .enumerate()
        .map(|(index, s)| s.fitness().ok_or(SelectionError::MissingFitness { index }))
        .collect::<Result<Vec<f64>, _>>()?;

    let mut alive: Vec<usize> = (0..m).collect();
    while alive.len() > target {
        let Some((pos, &worst)) = alive.iter().enumerate().min_by(|a, b| {
            fitness[*a.1]
                .partial_cmp(&fitness[*b.1])
                .unwrap_or(Ordering::Equal)
        }) else {
            break;
        };

        trace!("removing solution {worst} with fitness {}", fitness[worst]);
        alive.remove(pos);

        for &y in &alive {
            fitness[y] += table.contribution(worst, y);
        }
    }

    let mut keep = vec![false; m];
    for &i in &alive {
        keep[i] = true;
    }

    Ok(population
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keep[*i])
        .map(|(i, mut s)| {
            s.set_fitness(fitness[i]);
            s
        })
        .collect())
}

/// Assigns indicator fitness to `population` and truncates it to `target`.
///
/// This is one full environmental selection pass: the pairwise table is
/// built, used for the removals, then dropped.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::environmental::environmental_selection;
/// use u_ibea::ibea::indicator::AdditiveEpsilon;
/// use u_ibea::ibea::Solution;
///
/// let set = vec![
///     Solution::with_objectives(vec![], vec![0.0, 1.0]),
///     Solution::with_objectives(vec![], vec![0.9, 0.9]), // dominated
///     Solution::with_objectives(vec![], vec![1.0, 0.0]),
/// ];
/// let kept = environmental_selection(set, &mut AdditiveEpsilon, 0.05, 2).unwrap();
/// assert_eq!(kept.len(), 2);
/// assert!(kept.iter().all(|s| s.objectives() != [0.9, 0.9]));
/// ```
pub fn environmental_selection<I: Indicator + ?Sized>(
    mut population: Vec<Solution>,
    indicator: &mut I,
    kappa: f64,
    target: usize,
) -> Result<Vec<Solution>, IbeaError> {
    if target > population.len() {
        return Err(IbeaError::TruncationTarget {
            target,
            available: population.len(),
        });
    }
    let table = assign_fitness(&mut population, indicator, kappa);
    truncate(population, &table, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibea::indicator::AdditiveEpsilon;
    use crate::random::create_rng;
    use rand::Rng;

    fn set(objs: &[[f64; 2]]) -> Vec<Solution> {
        objs.iter()
            .enumerate()
            .map(|(i, o)| Solution::with_objectives(vec![i as f64], o.to_vec()))
            .collect()
    }

    fn random_set(n: usize, seed: u64) -> Vec<Solution> {
        let mut rng = create_rng(seed);
        (0..n)
            .map(|i| {
                let o = vec![rng.random::<f64>(), rng.random::<f64>(), rng.random::<f64>()];
                Solution::with_objectives(vec![i as f64], o)
            })
            .collect()
    }

    #[test]
    fn test_exact_target_size() {
        for k in 0..=10 {
            let kept =
                environmental_selection(random_set(10, 7), &mut AdditiveEpsilon, 0.05, k).unwrap();
            assert_eq!(kept.len(), k);
        }
    }

    #[test]
    fn test_target_too_large_fails() {
        let err =
            environmental_selection(random_set(4, 1), &mut AdditiveEpsilon, 0.05, 5).unwrap_err();
        assert_eq!(
            err,
            IbeaError::TruncationTarget {
                target: 5,
                available: 4
            }
        );
    }

    #[test]
    fn test_no_removal_keeps_everything_in_order() {
        let s = random_set(6, 3);
        let kept = environmental_selection(s.clone(), &mut AdditiveEpsilon, 0.05, 6).unwrap();
        let ids: Vec<f64> = kept.iter().map(|x| x.variables()[0]).collect();
        assert_eq!(ids, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_dominated_removed_first() {
        let s = set(&[[0.0, 1.0], [0.5, 0.5], [0.6, 0.6], [1.0, 0.0], [0.8, 0.9]]);
        let kept = environmental_selection(s, &mut AdditiveEpsilon, 0.05, 3).unwrap();
        let ids: Vec<f64> = kept.iter().map(|x| x.variables()[0]).collect();
        assert_eq!(ids, vec![0.0, 1.0, 3.0]);
    }

    #[test]
    fn test_ties_remove_first_occurrence() {
        // All identical: c = 0, every fitness is 0, removal goes front to back.
        let s = set(&[[0.5, 0.5], [0.5, 0.5], [0.5, 0.5], [0.5, 0.5]]);
        let kept = environmental_selection(s, &mut AdditiveEpsilon, 0.05, 2).unwrap();
        let ids: Vec<f64> = kept.iter().map(|x| x.variables()[0]).collect();
        assert_eq!(ids, vec![2.0, 3.0]);
        assert!(kept.iter().all(|x| x.fitness() == Some(0.0)));
    }

    #[test]
    fn test_incremental_matches_fresh_assignment() {
        let kappa = 0.5;
        let mut s = random_set(30, 11);
        let table = assign_fitness(&mut s, &mut AdditiveEpsilon, kappa);
        let scale = table.scale();
        let kept = truncate(s, &table, 12).unwrap();

        let fresh = IndicatorFitness::with_scale(&kept, &mut AdditiveEpsilon, kappa, scale);
        for (x, expected) in kept.iter().zip(fresh.fitness_values()) {
            let got = x.fitness().unwrap();
            assert!(
                (got - expected).abs() <= 1e-9 * expected.abs().max(1.0),
                "incremental {got} vs fresh {expected}"
            );
        }
    }

    #[test]
    fn test_missing_fitness_is_reported() {
        let mut s = random_set(3, 5);
        let table = assign_fitness(&mut s, &mut AdditiveEpsilon, 0.05);
        s[1].remove_attribute(crate::ibea::FITNESS);
        let err = truncate(s, &table, 1).unwrap_err();
        assert_eq!(
            err,
            IbeaError::Selection(SelectionError::MissingFitness { index: 1 })
        );
    }

    #[test]
    fn test_mismatched_table_rejected() {
        let mut s = random_set(4, 5);
        let table = assign_fitness(&mut s, &mut AdditiveEpsilon, 0.05);
        s.pop();
        assert!(matches!(truncate(s, &table, 2), Err(IbeaError::Configuration(_))));
    }
}
