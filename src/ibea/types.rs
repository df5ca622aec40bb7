//! Core data types for IBEA.
//!
//! A [`Solution`] is a plain container: decision variables, objective values
//! and an open attribute map. Operators own the semantics of the attributes
//! they write (fitness assignment writes [`FITNESS`], for example); the
//! solution itself never interprets them.
//!
//! A [`Problem`] supplies bounds and objective evaluation.

use crate::error::EvaluationError;
use rand::Rng;
use std::collections::BTreeMap;

/// Attribute name under which fitness assignment stores fitness.
pub const FITNESS: &str = "fitness";

/// A candidate solution: variables, objectives and operator attributes.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::Solution;
///
/// let mut s = Solution::new(vec![0.2, 0.7]);
/// assert!(!s.is_evaluated());
///
/// s.set_objectives(vec![0.2, 0.8]);
/// s.set_fitness(-1.5);
/// assert_eq!(s.fitness(), Some(-1.5));
/// assert_eq!(s.attribute("rank"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    variables: Vec<f64>,
    objectives: Vec<f64>,
    attributes: BTreeMap<String, f64>,
}

impl Solution {
    /// Creates an unevaluated solution from decision variables.
    pub fn new(variables: Vec<f64>) -> Self {
        Self {
            variables,
            objectives: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a solution with known objective values.
    pub fn with_objectives(variables: Vec<f64>, objectives: Vec<f64>) -> Self {
        Self {
            variables,
            objectives,
            attributes: BTreeMap::new(),
        }
    }

    /// Decision variables.
    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Objective values. Empty until evaluated.
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Number of decision variables.
    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of objective values.
    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Whether objectives have been populated.
    pub fn is_evaluated(&self) -> bool {
        !self.objectives.is_empty()
    }

    /// Stores objective values.
    pub fn set_objectives(&mut self, objectives: Vec<f64>) {
        self.objectives = objectives;
    }


    /// Reads an attribute.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    /// Writes an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: f64) {
        match self.attributes.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.attributes.insert(name.to_owned(), value);
            }
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<f64> {
        self.attributes.remove(name)
    }

    /// Shorthand for the [`FITNESS`] attribute.
    pub fn fitness(&self) -> Option<f64> {
        self.attribute(FITNESS)
    }

    /// Shorthand for writing the [`FITNESS`] attribute.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.set_attribute(FITNESS, fitness);
    }
}

/// Defines a multi-objective minimization problem over real variables.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` because the runner may evaluate a batch
/// of solutions in parallel when the `parallel` feature is enabled.
///
/// # Implementing
///
/// ```
/// use u_ibea::error::EvaluationError;
/// use u_ibea::ibea::Problem;
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn bounds(&self, _index: usize) -> (f64, f64) { (-10.0, 10.0) }
///     fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
///         Ok(vec![x[0] * x[0], (x[0] - 2.0).powi(2)])
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Number of decision variables.
    fn number_of_variables(&self) -> usize;

    /// Number of objectives, all minimized.
    fn number_of_objectives(&self) -> usize;

    /// Inclusive `(min, max)` bounds of variable `index`.
    fn bounds(&self, index: usize) -> (f64, f64);

    /// Computes the objective vector for `variables`.
    ///
    /// The runner calls [`check_bounds`](Problem::check_bounds) first, so
    /// implementations may assume in-bound input.
    fn evaluate(&self, variables: &[f64]) -> Result<Vec<f64>, EvaluationError>;

    /// Verifies length and bounds of a variable vector.
    fn check_bounds(&self, variables: &[f64]) -> Result<(), EvaluationError> {
        let n = self.number_of_variables();
        if variables.len() != n {
            return Err(EvaluationError::DimensionMismatch {
                expected: n,
                actual: variables.len(),
            });
        }
        for (index, &value) in variables.iter().enumerate() {
            let (min, max) = self.bounds(index);
            // NaN fails both comparisons, so test for containment.
            if !(value >= min && value <= max) {
                return Err(EvaluationError::OutOfBounds {
                    index,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Creates a random solution, uniform within bounds.
    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution {
        let variables = (0..self.number_of_variables())
            .map(|i| {
                let (min, max) = self.bounds(i);
                rng.random_range(min..=max)
            })
            .collect();
        Solution::new(variables)
    }
}

/// Checks bounds, evaluates, and stores objectives on `solution`.
///
/// Fails if the variables are out of bounds or the problem returns the wrong
/// number of objectives.
pub fn evaluate_solution<P: Problem + ?Sized>(
    problem: &P,
    solution: &mut Solution,
) -> Result<(), EvaluationError> {
    problem.check_bounds(solution.variables())?;
    let objectives = problem.evaluate(solution.variables())?;
    let m = problem.number_of_objectives();
    if objectives.len() != m {
        return Err(EvaluationError::DimensionMismatch {
            expected: m,
            actual: objectives.len(),
        });
    }
    solution.set_objectives(objectives);
    Ok(())
}
