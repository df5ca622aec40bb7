//! Indicator-based fitness assignment.
//!
//! For a working set `S` and scaling factor `kappa`:
//!
//! ```text
//! fitness(x) = Σ_{y ∈ S, y ≠ x} -exp(-I(y, x) / (c · kappa))
//! c          = max_{p, q ∈ S} |I(p, q)|
//! ```
//!
//! Fitness is always ≤ 0; values closer to zero are better. When `c = 0`
//! every contribution is taken as zero, so every fitness is zero.
//!
//! The pairwise values are kept in an [`IndicatorFitness`] for the duration
//! of one selection pass so that environmental selection can reverse a
//! removed individual's contribution in O(n).

use super::indicator::Indicator;
use super::types::Solution;

/// Pairwise indicator values and normalization of one working set.
#[derive(Debug, Clone)]
pub struct IndicatorFitness {
    /// Row-major `n × n`: `values[i * n + j] = I(s_i, s_j)`.
    values: Vec<f64>,
    n: usize,
    scale: f64,
    kappa: f64,
}

impl IndicatorFitness {
    /// Computes all pairwise indicator values of `solutions`.
    ///
    /// Calls [`Indicator::prepare`] on the objectives of the whole set first.
    /// The scale constant `c` is the largest absolute indicator value.
    pub fn compute<I: Indicator + ?Sized>(
        solutions: &[Solution],
        indicator: &mut I,
        kappa: f64,
    ) -> Self {
        let mut table = Self::pairwise(solutions, indicator, kappa);
        table.scale = table.values.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()));
        table
    }

    /// Like [`compute`](Self::compute) but with a caller-supplied scale `c`.
    ///
    /// Used to compare a truncated set against a fresh assignment under the
    /// same normalization.
    pub fn with_scale<I: Indicator + ?Sized>(
        solutions: &[Solution],
        indicator: &mut I,
        kappa: f64,
        scale: f64,
    ) -> Self {
        let mut table = Self::pairwise(solutions, indicator, kappa);
        table.scale = scale.abs();
        table
    }

    fn pairwise<I: Indicator + ?Sized>(
        solutions: &[Solution],
        indicator: &mut I,
        kappa: f64,
    ) -> Self {
        let objectives: Vec<&[f64]> = solutions.iter().map(|s| s.objectives()).collect();
        debug_assert!(
            solutions.iter().all(Solution::is_evaluated),
            "fitness assignment requires evaluated solutions"
        );
        indicator.prepare(&objectives);

        let n = objectives.len();
        let mut values = Vec::with_capacity(n * n);
        for a in &objectives {
            for b in &objectives {
                values.push(indicator.value(a, b));
            }
        }

        Self {
            values,
            n,
            scale: 0.0,
            kappa,
        }
    }

    /// Number of solutions in the working set.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Normalization constant `c`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scaling factor `kappa`.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Indicator value `I(s_from, s_to)`.
    pub fn value(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }

    /// Magnitude of the fitness penalty `s_from` imposes on `s_to`:
    /// `exp(-I(s_from, s_to) / (c · kappa))`, or zero when `c = 0`.
    pub fn contribution(&self, from: usize, to: usize) -> f64 {
        if self.scale == 0.0 {
            return 0.0;
        }
        (-self.value(from, to) / (self.scale * self.kappa)).exp()
    }

    /// Fitness of every member, in input order.
    pub fn fitness_values(&self) -> Vec<f64> {
        (0..self.n)
            .map(|x| {
                (0..self.n)
                    .filter(|&y| y != x)
                    .map(|y| -self.contribution(y, x))
                    .sum()
            })
            .collect()
    }

    /// Writes the `fitness` attribute on each solution.
    ///
    /// `solutions` must be the set this table was computed from, in the
    /// same order.
    pub fn assign(&self, solutions: &mut [Solution]) {
        debug_assert_eq!(solutions.len(), self.n, "solution set does not match table");
        for (solution, fitness) in solutions.iter_mut().zip(self.fitness_values()) {
            solution.set_fitness(fitness);
        }
    }
}

/// Computes indicator fitness for `solutions` and writes it to their
/// `fitness` attribute.
///
/// Returns the pairwise table for use by environmental selection.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::fitness::assign_fitness;
/// use u_ibea::ibea::indicator::AdditiveEpsilon;
/// use u_ibea::ibea::Solution;
///
/// let mut set = vec![
///     Solution::with_objectives(vec![], vec![0.0, 1.0]),
///     Solution::with_objectives(vec![], vec![1.0, 0.0]),
///     Solution::with_objectives(vec![], vec![1.0, 1.0]), // dominated
/// ];
/// let table = assign_fitness(&mut set, &mut AdditiveEpsilon, 0.05);
///
/// assert_eq!(table.scale(), 1.0);
/// let dominated = set[2].fitness().unwrap();
/// assert!(set[0].fitness().unwrap() > dominated);
/// assert!(set[1].fitness().unwrap() > dominated);
/// ```
pub fn assign_fitness<I: Indicator + ?Sized>(
    solutions: &mut [Solution],
    indicator: &mut I,
    kappa: f64,
) -> IndicatorFitness {
    let table = IndicatorFitness::compute(solutions, indicator, kappa);
    table.assign(solutions);
    table
}
