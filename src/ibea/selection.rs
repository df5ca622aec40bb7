//! Mating selection operators.
//!
//! Mating selection picks parents from the archive. Both operators return
//! an index into the population they were given and borrow it only for the
//! duration of the call.
//!
//! - [`BinaryTournament`]: two distinct random candidates, the preferred one
//!   by a [`SolutionComparator`] wins
//! - [`RouletteWheelSelection`]: fitness-proportionate selection on
//!   `|fitness|` by rejection sampling
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Lipowski & Lipowska (2012), "Roulette-wheel selection via stochastic
//!   acceptance"

use super::types::Solution;
use crate::error::SelectionError;
use log::warn;
use rand::Rng;
use std::cmp::Ordering;

/// Orders two solutions by preference.
///
/// `Ordering::Less` means `a` is preferred over `b`.
pub trait SolutionComparator {
    /// Compares `a` against `b`.
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering;
}

impl<F> SolutionComparator for F
where
    F: Fn(&Solution, &Solution) -> Ordering,
{
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        self(a, b)
    }
}

/// Compares solutions by their `fitness` attribute.
///
/// A solution without fitness is never preferred over one with fitness.
///
/// IBEA fitness is higher-is-better, so the search loop uses
/// [`FitnessComparator::higher_is_better`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessComparator {
    higher_is_better: bool,
}

impl FitnessComparator {
    /// Prefers the larger fitness value.
    pub fn higher_is_better() -> Self {
        Self {
            higher_is_better: true,
        }
    }

    /// Prefers the smaller fitness value.
    pub fn lower_is_better() -> Self {
        Self {
            higher_is_better: false,
        }
    }
}

impl SolutionComparator for FitnessComparator {
    fn compare(&self, a: &Solution, b: &Solution) -> Ordering {
        match (a.fitness(), b.fitness()) {
            (Some(fa), Some(fb)) => {
                let ord = fa.partial_cmp(&fb).unwrap_or(Ordering::Equal);
                if self.higher_is_better {
                    ord.reverse()
                } else {
                    ord
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Binary tournament selection.
///
/// Draws two distinct indices uniformly at random and returns the one the
/// comparator prefers. On a tie, one more draw decides between the two.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::selection::{BinaryTournament, FitnessComparator};
/// use u_ibea::ibea::Solution;
/// use u_ibea::random::create_rng;
///
/// let mut pop = vec![Solution::new(vec![0.0]), Solution::new(vec![1.0])];
/// pop[0].set_fitness(-5.0);
/// pop[1].set_fitness(-1.0);
///
/// let tournament = BinaryTournament::new(FitnessComparator::higher_is_better());
/// let mut rng = create_rng(42);
/// // With two members both are always drawn, so the better one wins.
/// assert_eq!(tournament.select(&pop, &mut rng), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct BinaryTournament<C> {
    comparator: C,
}

impl<C: SolutionComparator> BinaryTournament<C> {
    /// Creates a tournament using `comparator`.
    pub fn new(comparator: C) -> Self {
        Self { comparator }
    }

    /// Draws the two distinct candidate indices for one tournament.
    ///
    /// Requires `n ≥ 2`.
    fn draw<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
        let first = rng.random_range(0..n);
        let mut second = rng.random_range(0..n - 1);
        if second >= first {
            second += 1;
        }
        (first, second)
    }

    /// Selects a parent index.
    ///
    /// Returns `None` for an empty population and `Some(0)`, without
    /// drawing, for a single-member population.
    pub fn select<R: Rng>(&self, population: &[Solution], rng: &mut R) -> Option<usize> {
        match population.len() {
            0 => None,
            1 => Some(0),
            n => {
                let (i, j) = Self::draw(n, rng);
                let winner = match self.comparator.compare(&population[i], &population[j]) {
                    Ordering::Less => i,
                    Ordering::Greater => j,
                    Ordering::Equal => {
                        if rng.random_bool(0.5) {
                            i
                        } else {
                            j
                        }
                    }
                };
                Some(winner)
            }
        }
    }
}

/// Default cap on rejection-sampling attempts per selection.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

/// Fitness-proportionate (roulette wheel) selection by stochastic acceptance.
///
/// The weight of a candidate is the absolute value of its fitness: under a
/// minimization convention a fitness of `-1` is as far from the optimum `0`
/// as a fitness of `1`. Each attempt draws a uniform index and accepts it
/// with probability `|fitness| / max_fitness`, so the long-run selection
/// frequency of a candidate is `|f_i| / Σ|f|`.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::selection::RouletteWheelSelection;
/// use u_ibea::ibea::Solution;
/// use u_ibea::random::create_rng;
///
/// let mut pop = vec![Solution::new(vec![]), Solution::new(vec![])];
/// pop[0].set_fitness(0.0);
/// pop[1].set_fitness(-3.0);
///
/// let roulette = RouletteWheelSelection::new();
/// let mut rng = create_rng(1);
/// // A zero-weight candidate is never accepted.
/// assert_eq!(roulette.select(&pop, &mut rng).unwrap(), Some(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouletteWheelSelection {
    max_fitness: Option<f64>,
    max_attempts: usize,
}

impl Default for RouletteWheelSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl RouletteWheelSelection {
    /// Creates a selector that scans the population for its maximum
    /// absolute fitness on every call.
    pub fn new() -> Self {
        Self {
            max_fitness: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Supplies a known maximum absolute fitness, skipping the scan.
    ///
    /// Non-positive values mean "unknown" and restore scanning.
    pub fn with_max_fitness(mut self, max_fitness: f64) -> Self {
        self.max_fitness = (max_fitness > 0.0).then_some(max_fitness);
        self
    }

    /// Sets the rejection-sampling retry cap (at least 1).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// The supplied maximum absolute fitness, if any.
    pub fn max_fitness(&self) -> Option<f64> {
        self.max_fitness
    }

    /// Selects a parent index.
    ///
    /// Returns `Ok(None)` for an empty population and `Ok(Some(0))`, without
    /// drawing, for a single-member population.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::MissingFitness`] if a candidate has no fitness
    /// - [`SelectionError::ZeroFitness`] if every candidate has zero fitness
    /// - [`SelectionError::Exhausted`] if no candidate is accepted within
    ///   the retry cap
    pub fn select<R: Rng>(
        &self,
        population: &[Solution],
        rng: &mut R,
    ) -> Result<Option<usize>, SelectionError> {
        let n = population.len();
        match n {
            0 => return Ok(None),
            1 => return Ok(Some(0)),
            _ => {}
        }

        let max_fitness = match self.max_fitness {
            Some(m) => m,
            None => scan_max_magnitude(population)?,
        };
        if max_fitness == 0.0 {
            return Err(SelectionError::ZeroFitness { population: n });
        }

        for _ in 0..self.max_attempts {
            let index = rng.random_range(0..n);
            let weight = magnitude(population, index)?;
            if rng.random::<f64>() < weight / max_fitness {
                return Ok(Some(index));
            }
        }

        warn!(
            "roulette selection exhausted {} attempts over {n} candidates (max fitness {max_fitness})",
            self.max_attempts
        );
        Err(SelectionError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

fn magnitude(population: &[Solution], index: usize) -> Result<f64, SelectionError> {
    population[index]
        .fitness()
        .map(f64::abs)
        .ok_or(SelectionError::MissingFitness { index })
}

fn scan_max_magnitude(population: &[Solution]) -> Result<f64, SelectionError> {
    (0..population.len()).try_fold(0.0_f64, |acc, i| Ok(acc.max(magnitude(population, i)?)))
}
