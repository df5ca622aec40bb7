//! Real-coded variation operators.
//!
//! # Crossover Operators
//!
//! - [`SbxCrossover`]: bounded Simulated Binary Crossover (Deb & Agrawal, 1995)
//!
//! # Mutation Operators
//!
//! - [`PolynomialMutation`]: bounded polynomial mutation (Deb & Goyal, 1996)
//!
//! [`VariationPipeline`] chains one crossover and one mutation into the
//! [`Variation`] capability used by the search loop. Offspring are always
//! fresh owned vectors; parents are never modified.
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design"

use super::types::Solution;
use rand::Rng;

/// Parents closer than this in a variable are not recombined.
const EPS: f64 = 1.0e-14;

/// Recombines two parent variable vectors into two children.
pub trait Crossover {
    /// Produces two children. `bounds[i]` is the `(min, max)` of variable `i`.
    fn crossover<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> (Vec<f64>, Vec<f64>);
}

/// Perturbs a variable vector in place.
pub trait Mutation {
    /// Mutates `variables`. `bounds[i]` is the `(min, max)` of variable `i`.
    fn mutate<R: Rng>(&self, variables: &mut [f64], bounds: &[(f64, f64)], rng: &mut R);
}

/// Produces one offspring from two parents.
pub trait Variation {
    /// Creates an unevaluated offspring.
    fn offspring<R: Rng>(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> Solution;
}

// ============================================================================
// Crossover
// ============================================================================

/// Bounded Simulated Binary Crossover.
///
/// With probability `probability` the pair is recombined; each variable is
/// then crossed with probability 0.5. The spread of children around the
/// parents shrinks as `distribution_index` grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SbxCrossover {
    /// Probability of recombining a pair (0.0–1.0).
    pub probability: f64,

    /// Distribution index η_c (typically 2–20).
    pub distribution_index: f64,
}

impl Default for SbxCrossover {
    fn default() -> Self {
        Self::new(0.9, 20.0)
    }
}

impl SbxCrossover {
    /// Creates an SBX operator.
    pub fn new(probability: f64, distribution_index: f64) -> Self {
        Self {
            probability,
            distribution_index,
        }
    }

    /// Spread factor β_q for a bounded side.
    ///
    /// `beta` is `1 + 2 · (distance to bound) / (y2 - y1)`.
    fn spread(&self, beta: f64, u: f64) -> f64 {
        let exp = self.distribution_index + 1.0;
        let alpha = 2.0 - beta.powf(-exp);
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / exp)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / exp)
        }
    }
}

impl Crossover for SbxCrossover {
    fn crossover<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> (Vec<f64>, Vec<f64>) {
        debug_assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
        let mut child1 = parent1.to_vec();
        let mut child2 = parent2.to_vec();

        if rng.random::<f64>() >= self.probability {
            return (child1, child2);
        }

        for (i, &(lower, upper)) in bounds.iter().enumerate().take(parent1.len()) {
            if rng.random::<f64>() > 0.5 {
                continue;
            }
            let (x1, x2) = (parent1[i], parent2[i]);
            if (x1 - x2).abs() <= EPS {
                continue;
            }

            let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
            let u = rng.random::<f64>();

            let beta_low = 1.0 + 2.0 * (y1 - lower) / (y2 - y1);
            let c1 = 0.5 * ((y1 + y2) - self.spread(beta_low, u) * (y2 - y1));

            let beta_high = 1.0 + 2.0 * (upper - y2) / (y2 - y1);
            let c2 = 0.5 * ((y1 + y2) + self.spread(beta_high, u) * (y2 - y1));

            let c1 = c1.clamp(lower, upper);
            let c2 = c2.clamp(lower, upper);

            if rng.random::<f64>() <= 0.5 {
                child1[i] = c2;
                child2[i] = c1;
            } else {
                child1[i] = c1;
                child2[i] = c2;
            }
        }

        (child1, child2)
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Bounded polynomial mutation.
///
/// Each variable is mutated with probability `probability`; the size of the
/// perturbation shrinks as `distribution_index` grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialMutation {
    /// Per-variable mutation probability (0.0–1.0), typically `1 / n`.
    pub probability: f64,

    /// Distribution index η_m (typically 20–100).
    pub distribution_index: f64,
}

impl PolynomialMutation {
    /// Creates a polynomial mutation operator.
    pub fn new(probability: f64, distribution_index: f64) -> Self {
        Self {
            probability,
            distribution_index,
        }
    }

    fn mutate_value<R: Rng>(&self, y: f64, lower: f64, upper: f64, rng: &mut R) -> f64 {
        let range = upper - lower;
        if range <= 0.0 {
            return lower;
        }

        let delta1 = (y - lower) / range;
        let delta2 = (upper - y) / range;
        let exp = self.distribution_index + 1.0;
        let u = rng.random::<f64>();

        let delta_q = if u <= 0.5 {
            let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta1).powf(exp);
            val.powf(1.0 / exp) - 1.0
        } else {
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - delta2).powf(exp);
            1.0 - val.powf(1.0 / exp)
        };

        (y + delta_q * range).clamp(lower, upper)
    }
}

impl Mutation for PolynomialMutation {
    fn mutate<R: Rng>(&self, variables: &mut [f64], bounds: &[(f64, f64)], rng: &mut R) {
        for (y, &(lower, upper)) in variables.iter_mut().zip(bounds) {
            if rng.random::<f64>() < self.probability {
                *y = self.mutate_value(*y, lower, upper, rng);
            }
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Crossover followed by mutation of the first child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationPipeline<C, M> {
    /// Recombination step.
    pub crossover: C,
    /// Perturbation step.
    pub mutation: M,
}

impl<C, M> VariationPipeline<C, M> {
    /// Chains `crossover` and `mutation`.
    pub fn new(crossover: C, mutation: M) -> Self {
        Self {
            crossover,
            mutation,
        }
    }
}

impl<C: Crossover, M: Mutation> Variation for VariationPipeline<C, M> {
    fn offspring<R: Rng>(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> Solution {
        let (mut child, _) = self.crossover.crossover(
            parent1.variables(),
            parent2.variables(),
            bounds,
            rng,
        );
        self.mutation.mutate(&mut child, bounds, rng);
        Solution::new(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn unit_bounds(n: usize) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); n]
    }

    #[test]
    fn test_sbx_children_within_bounds() {
        let sbx = SbxCrossover::new(1.0, 20.0);
        let bounds = unit_bounds(5);
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let p1: Vec<f64> = (0..5).map(|_| rng.random()).collect();
            let p2: Vec<f64> = (0..5).map(|_| rng.random()).collect();
            let (c1, c2) = sbx.crossover(&p1, &p2, &bounds, &mut rng);
            assert_eq!(c1.len(), 5);
            assert!(c1.iter().chain(&c2).all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_sbx_zero_probability_copies_parents() {
        let sbx = SbxCrossover::new(0.0, 20.0);
        let mut rng = create_rng(42);
        let p1 = vec![0.1, 0.2];
        let p2 = vec![0.8, 0.9];
        for _ in 0..100 {
            let (c1, c2) = sbx.crossover(&p1, &p2, &unit_bounds(2), &mut rng);
            assert_eq!(c1, p1);
            assert_eq!(c2, p2);
        }
    }

    #[test]
    fn test_sbx_identical_parents() {
        let sbx = SbxCrossover::new(1.0, 20.0);
        let mut rng = create_rng(42);
        let p = vec![0.4, 0.6, 0.5];
        let (c1, c2) = sbx.crossover(&p, &p, &unit_bounds(3), &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_sbx_high_index_stays_near_parents() {
        let sbx = SbxCrossover::new(1.0, 200.0);
        let bounds = unit_bounds(1);
        let mut rng = create_rng(9);
        for _ in 0..200 {
            let (c1, c2) = sbx.crossover(&[0.4], &[0.6], &bounds, &mut rng);
            for c in [c1[0], c2[0]] {
                assert!((0.35..=0.65).contains(&c), "child {c} strayed from parents");
            }
        }
    }

    #[test]
    fn test_polynomial_mutation_within_bounds() {
        let pm = PolynomialMutation::new(1.0, 20.0);
        let bounds = vec![(-2.0, 3.0); 4];
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            let mut x = vec![-2.0, 3.0, 0.0, 1.5];
            pm.mutate(&mut x, &bounds, &mut rng);
            assert!(x.iter().all(|&v| (-2.0..=3.0).contains(&v)));
        }
    }

    #[test]
    fn test_polynomial_mutation_zero_probability() {
        let pm = PolynomialMutation::new(0.0, 20.0);
        let mut rng = create_rng(42);
        let mut x = vec![0.3, 0.7];
        pm.mutate(&mut x, &unit_bounds(2), &mut rng);
        assert_eq!(x, vec![0.3, 0.7]);
    }

    #[test]
    fn test_polynomial_mutation_changes_values() {
        let pm = PolynomialMutation::new(1.0, 20.0);
        let mut rng = create_rng(42);
        let mut x = vec![0.5; 10];
        pm.mutate(&mut x, &unit_bounds(10), &mut rng);
        assert!(x.iter().any(|&v| v != 0.5));
    }

    #[test]
    fn test_polynomial_mutation_degenerate_bounds() {
        let pm = PolynomialMutation::new(1.0, 20.0);
        let mut rng = create_rng(42);
        let mut x = vec![0.25];
        pm.mutate(&mut x, &[(0.25, 0.25)], &mut rng);
        assert_eq!(x, vec![0.25]);
    }

    #[test]
    fn test_pipeline_leaves_parents_untouched() {
        let pipeline = VariationPipeline::new(
            SbxCrossover::new(1.0, 20.0),
            PolynomialMutation::new(1.0, 20.0),
        );
        let mut a = Solution::with_objectives(vec![0.1, 0.9], vec![1.0, 2.0]);
        a.set_fitness(-1.0);
        let b = Solution::with_objectives(vec![0.8, 0.2], vec![2.0, 1.0]);
        let before = (a.clone(), b.clone());

        let mut rng = create_rng(42);
        let child = pipeline.offspring(&a, &b, &unit_bounds(2), &mut rng);

        assert_eq!((a, b), before);
        assert_eq!(child.number_of_variables(), 2);
        assert!(!child.is_evaluated());
        assert_eq!(child.fitness(), None);
    }
}
