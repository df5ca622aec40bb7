//! Pareto dominance utilities.
//!
//! IBEA itself never ranks solutions by dominance; these helpers are used
//! by the hypervolume indicator and to extract the non-dominated subset of
//! the final archive.

use super::types::Solution;

/// Whether `a` Pareto-dominates `b` (minimization).
///
/// `a` must be no worse in every objective and strictly better in at least
/// one. Equal vectors do not dominate each other.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&va, &vb) in a.iter().zip(b) {
        if va > vb {
            return false;
        }
        strictly_better |= va < vb;
    }
    strictly_better
}

/// Indices of the objective vectors no other vector dominates, in input
/// order.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::multi_objective::non_dominated_filter;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![4.0, 4.0], // dominated by [3, 3]
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
/// assert_eq!(non_dominated_filter(&objectives), vec![0, 2, 3]);
/// ```
pub fn non_dominated_filter<O: AsRef<[f64]>>(objectives: &[O]) -> Vec<usize> {
    (0..objectives.len())
        .filter(|&i| {
            !objectives
                .iter()
                .any(|other| dominates(other.as_ref(), objectives[i].as_ref()))
        })
        .collect()
}

/// Indices of the non-dominated members of `solutions`, in input order.
pub fn non_dominated_indices(solutions: &[Solution]) -> Vec<usize> {
    let objectives: Vec<&[f64]> = solutions.iter().map(|s| s.objectives()).collect();
    non_dominated_filter(&objectives)
}
