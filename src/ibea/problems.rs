//! Benchmark problems with known Pareto fronts.
//!
//! Used by the tests and benchmarks; handy as templates for implementing
//! [`Problem`].

use super::types::Problem;
use crate::error::EvaluationError;

/// Two-variable linear bi-objective problem on `[0, 1]²`.
///
/// ```text
/// f1 = x1
/// f2 = 1 - x1 + x2
/// ```
///
/// The Pareto front is `x2 = 0`, i.e. the segment `f1 + f2 = 1`,
/// `f1 ∈ [0, 1]`. The distance of a point to the front along `f2` is
/// `f1 + f2 - 1 = x2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearBiObjective;

impl LinearBiObjective {
    /// How far `objectives` lies above the front, along `f2`.
    pub fn front_distance(objectives: &[f64]) -> f64 {
        objectives[0] + objectives[1] - 1.0
    }
}

impl Problem for LinearBiObjective {
    fn number_of_variables(&self) -> usize {
        2
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn bounds(&self, _index: usize) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        Ok(vec![x[0], 1.0 - x[0] + x[1]])
    }
}

/// ZDT1 (Zitzler, Deb & Thiele, 2000) with `n` variables on `[0, 1]ⁿ`.
///
/// The Pareto front is `f2 = 1 - sqrt(f1)`, reached when `x2..xn = 0`.
#[derive(Debug, Clone, Copy)]
pub struct Zdt1 {
    /// Number of decision variables (at least 2).
    pub n: usize,
}

impl Default for Zdt1 {
    fn default() -> Self {
        Self { n: 30 }
    }
}

impl Zdt1 {
    /// Vertical distance of `objectives` above the front.
    pub fn front_distance(objectives: &[f64]) -> f64 {
        objectives[1] - (1.0 - objectives[0].max(0.0).sqrt())
    }
}

impl Problem for Zdt1 {
    fn number_of_variables(&self) -> usize {
        self.n
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn bounds(&self, _index: usize) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        if self.n < 2 {
            return Err(EvaluationError::Failed("ZDT1 needs at least 2 variables".into()));
        }
        let f1 = x[0];
        let g = 1.0 + 9.0 * x[1..].iter().sum::<f64>() / (self.n - 1) as f64;
        let f2 = g * (1.0 - (f1 / g).sqrt());
        Ok(vec![f1, f2])
    }
}
