//! IBEA search loop execution.
//!
//! [`IbeaRunner`] orchestrates the complete process:
//! initialization → evaluation → environmental selection → repeat
//! {mating selection → variation → evaluation → merge → environmental
//! selection} until the evaluation budget is spent.

use super::config::IbeaConfig;
use super::environmental::environmental_selection;
use super::indicator::Indicator;
use super::multi_objective::non_dominated_indices;
use super::operators::{PolynomialMutation, SbxCrossover, Variation, VariationPipeline};
use super::selection::{BinaryTournament, FitnessComparator};
use super::types::{evaluate_solution, Problem, Solution};
use crate::error::{EvaluationError, IbeaError, RunError};
use crate::random::rng_from_seed;
use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Archive statistics at the end of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number (0 = initial population).
    pub generation: usize,

    /// Evaluations spent so far.
    pub evaluations: usize,

    /// Archive size after environmental selection.
    pub archive_size: usize,

    /// Highest (best) fitness in the archive.
    pub best_fitness: f64,

    /// Lowest (worst) fitness in the archive.
    pub worst_fitness: f64,
}

impl GenerationStats {
    fn of(generation: usize, evaluations: usize, archive: &[Solution]) -> Self {
        let (best_fitness, worst_fitness) = archive
            .iter()
            .filter_map(Solution::fitness)
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), f| (hi.max(f), lo.min(f)));
        Self {
            generation,
            evaluations,
            archive_size: archive.len(),
            best_fitness,
            worst_fitness,
        }
    }
}

/// Result of an IBEA run.
#[derive(Debug, Clone)]
pub struct IbeaResult {
    /// Final archive, with fitness relative to the archive itself.
    pub archive: Vec<Solution>,

    /// Number of generations executed after initialization.
    pub generations: usize,

    /// Total objective evaluations.
    pub evaluations: usize,

    /// Statistics after initialization and after every generation.
    pub history: Vec<GenerationStats>,
}

impl IbeaResult {
    /// Non-dominated members of the final archive.
    pub fn pareto_front(&self) -> Vec<Solution> {
        non_dominated_indices(&self.archive)
            .into_iter()
            .map(|i| self.archive[i].clone())
            .collect()
    }
}

/// Executes the IBEA search loop.
///
/// # Usage
///
/// ```
/// use u_ibea::ibea::problems::LinearBiObjective;
/// use u_ibea::ibea::{IbeaConfig, IbeaRunner};
///
/// let config = IbeaConfig::default()
///     .with_population_size(10)
///     .with_archive_size(10)
///     .with_max_evaluations(200)
///     .with_seed(42);
/// let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
/// assert!(result.archive.len() <= 10);
/// assert!(!result.pareto_front().is_empty());
/// ```
pub struct IbeaRunner;

impl IbeaRunner {
    /// Runs IBEA with SBX crossover, polynomial mutation and the indicator
    /// named in `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] if the configuration is invalid, an evaluation
    /// fails, or environmental selection cannot reach its target.
    pub fn run<P: Problem>(problem: &P, config: &IbeaConfig) -> Result<IbeaResult, RunError> {
        let variation = VariationPipeline::new(
            SbxCrossover::new(config.crossover_probability, config.crossover_distribution_index),
            PolynomialMutation::new(
                config.effective_mutation_probability(problem.number_of_variables()),
                config.mutation_distribution_index,
            ),
        );
        let mut indicator = config.indicator.build();
        Self::run_with(problem, &variation, &mut indicator, config)
    }

    /// Runs IBEA with a caller-supplied variation pipeline and indicator.
    ///
    /// `config.indicator` and the variation knobs in `config` are ignored.
    pub fn run_with<P, V, I>(
        problem: &P,
        variation: &V,
        indicator: &mut I,
        config: &IbeaConfig,
    ) -> Result<IbeaResult, RunError>
    where
        P: Problem,
        V: Variation,
        I: Indicator + ?Sized,
    {
        config
            .validate()
            .map_err(|e| RunError::new(0, 0, IbeaError::Configuration(e)))?;

        let mut rng = rng_from_seed(config.seed);
        let bounds: Vec<(f64, f64)> = (0..problem.number_of_variables())
            .map(|i| problem.bounds(i))
            .collect();
        let tournament = BinaryTournament::new(FitnessComparator::higher_is_better());

        info!(
            "IBEA start: population {}, archive {}, budget {} evaluations, kappa {}",
            config.population_size, config.archive_size, config.max_evaluations, config.kappa
        );

        // 1. Initialize and evaluate
        let mut population: Vec<Solution> = (0..config.population_size)
            .map(|_| problem.create_solution(&mut rng))
            .collect();
        let mut evaluations = 0usize;
        evaluate_batch(problem, &mut population, config.parallel, &mut evaluations)
            .map_err(|e| RunError::new(0, evaluations, e))?;

        // 2. Initial fitness assignment
        let target = config.archive_size.min(population.len());
        let mut archive = environmental_selection(population, indicator, config.kappa, target)
            .map_err(|e| RunError::new(0, evaluations, e))?;

        let mut history = vec![GenerationStats::of(0, evaluations, &archive)];
        let mut generation = 0usize;

        // 3. Generational loop
        while evaluations < config.max_evaluations {
            generation += 1;

            // Mating selection and variation
            let mut offspring = Vec::with_capacity(config.population_size);
            while offspring.len() < config.population_size {
                let (Some(a), Some(b)) = (
                    tournament.select(&archive, &mut rng),
                    tournament.select(&archive, &mut rng),
                ) else {
                    return Err(RunError::new(
                        generation,
                        evaluations,
                        IbeaError::Configuration("archive is empty".into()),
                    ));
                };
                offspring.push(variation.offspring(&archive[a], &archive[b], &bounds, &mut rng));
            }

            evaluate_batch(problem, &mut offspring, config.parallel, &mut evaluations)
                .map_err(|e| RunError::new(generation, evaluations, e))?;

            // Merge and truncate
            let mut merged = archive;
            merged.append(&mut offspring);
            let target = config.archive_size.min(merged.len());
            archive = environmental_selection(merged, indicator, config.kappa, target)
                .map_err(|e| RunError::new(generation, evaluations, e))?;

            let stats = GenerationStats::of(generation, evaluations, &archive);
            debug!(
                "generation {}: {} evaluations, archive {}, fitness [{:.4e}, {:.4e}]",
                generation,
                evaluations,
                stats.archive_size,
                stats.worst_fitness,
                stats.best_fitness
            );
            history.push(stats);
        }

        info!(
            "IBEA done: {} generations, {} evaluations, archive {}",
            generation,
            evaluations,
            archive.len()
        );

        Ok(IbeaResult {
            archive,
            generations: generation,
            evaluations,
            history,
        })
    }
}

/// Evaluates every solution in `batch`, counting successes in order.
///
/// Stops at the first failure; `evaluations` then counts the solutions
/// evaluated before it.
fn evaluate_batch<P: Problem>(
    problem: &P,
    batch: &mut [Solution],
    parallel: bool,
    evaluations: &mut usize,
) -> Result<(), EvaluationError> {
    #[cfg(feature = "parallel")]
    if parallel {
        let outcomes: Vec<Result<(), EvaluationError>> = batch
            .par_iter_mut()
            .map(|s| evaluate_solution(problem, s))
            .collect();
        for outcome in outcomes {
            outcome?;
            *evaluations += 1;
        }
        return Ok(());
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for solution in batch.iter_mut() {
        evaluate_solution(problem, solution)?;
        *evaluations += 1;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibea::indicator::{AdditiveEpsilon, IndicatorKind};
    use crate::ibea::problems::{LinearBiObjective, Zdt1};
    use rand::Rng;

    fn small_config() -> IbeaConfig {
        IbeaConfig::default()
            .with_population_size(20)
            .with_archive_size(20)
            .with_max_evaluations(400)
            .with_seed(42)
    }

    #[test]
    fn test_archive_bounded_every_generation() {
        let result = IbeaRunner::run(&LinearBiObjective, &small_config()).unwrap();
        assert!(result.history.iter().all(|s| s.archive_size <= 20));
        assert_eq!(result.archive.len(), 20);
    }

    #[test]
    fn test_evaluation_counting() {
        let result = IbeaRunner::run(&LinearBiObjective, &small_config()).unwrap();
        // 20 initial + 20 per generation, stopping once 400 is reached.
        assert_eq!(result.evaluations, 400);
        assert_eq!(result.generations, 19);
        assert_eq!(result.history.len(), 20);
        for (g, stats) in result.history.iter().enumerate() {
            assert_eq!(stats.generation, g);
            assert_eq!(stats.evaluations, 20 * (g + 1));
        }
    }

    #[test]
    fn test_budget_overshoot_is_at_most_one_generation() {
        let config = small_config().with_max_evaluations(410);
        let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
        assert_eq!(result.evaluations, 420);
    }

    #[test]
    fn test_budget_spent_by_initialization() {
        let config = small_config().with_max_evaluations(5);
        let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.evaluations, 20);
        assert_eq!(result.archive.len(), 20);
        assert!(result.archive.iter().all(|s| s.fitness().is_some()));
    }

    #[test]
    fn test_small_archive_truncates_initial_population() {
        let config = small_config().with_archive_size(5);
        let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
        assert_eq!(result.history[0].archive_size, 5);
        assert!(result.history.iter().all(|s| s.archive_size == 5));
    }

    #[test]
    fn test_large_archive_fills_gradually() {
        let config = small_config().with_archive_size(50);
        let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
        let sizes: Vec<usize> = result.history.iter().map(|s| s.archive_size).collect();
        assert_eq!(&sizes[..4], &[20, 40, 50, 50]);
    }

    #[test]
    fn test_same_seed_same_archive() {
        let a = IbeaRunner::run(&LinearBiObjective, &small_config()).unwrap();
        let b = IbeaRunner::run(&LinearBiObjective, &small_config()).unwrap();
        assert_eq!(a.archive, b.archive);

        let c = IbeaRunner::run(&LinearBiObjective, &small_config().with_seed(43)).unwrap();
        assert_ne!(a.archive, c.archive);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = Zdt1 { n: 6 };
        for kind in [IndicatorKind::AdditiveEpsilon, IndicatorKind::Hypervolume] {
            let config = IbeaConfig::fast().with_seed(5).with_indicator(kind);
            let sequential =
                IbeaRunner::run(&problem, &config.clone().with_parallel(false)).unwrap();
            let parallel = IbeaRunner::run(&problem, &config.with_parallel(true)).unwrap();
            assert_eq!(sequential.archive, parallel.archive, "{kind:?}");
            assert_eq!(sequential.history, parallel.history, "{kind:?}");
            assert_eq!(sequential.evaluations, parallel.evaluations);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_kappa(-1.0);
        let err = IbeaRunner::run(&LinearBiObjective, &config).unwrap_err();
        assert_eq!(err.generation, 0);
        assert_eq!(err.evaluations, 0);
        assert!(matches!(err.source, IbeaError::Configuration(_)));
    }

    #[test]
    fn test_hypervolume_indicator_runs() {
        let config = small_config().with_indicator(IndicatorKind::Hypervolume);
        let result = IbeaRunner::run(&LinearBiObjective, &config).unwrap();
        assert_eq!(result.archive.len(), 20);
        assert!(result.archive.iter().all(|s| s.fitness().unwrap().is_finite()));
    }

    #[test]
    fn test_zdt1_improves() {
        let problem = Zdt1 { n: 10 };
        let config = IbeaConfig::default()
            .with_population_size(40)
            .with_archive_size(40)
            .with_max_evaluations(8_000)
            .with_seed(42);
        let result = IbeaRunner::run(&problem, &config).unwrap();

        let mean_distance = |set: &[Solution]| {
            set.iter()
                .map(|s| Zdt1::front_distance(s.objectives()))
                .sum::<f64>()
                / set.len() as f64
        };
        let front = result.pareto_front();
        assert!(
            mean_distance(&front) < 0.5,
            "ZDT1 front too far: {}",
            mean_distance(&front)
        );
    }

    // ---- Error propagation ----

    struct Explodes {
        after: std::sync::atomic::AtomicUsize,
    }

    impl Problem for Explodes {
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
            use std::sync::atomic::Ordering;
            if self.after.fetch_sub(1, Ordering::SeqCst) == 0 {
                return Err(EvaluationError::Failed("simulator crashed".into()));
            }
            Ok(vec![x[0], 1.0 - x[0]])
        }
    }

    #[test]
    fn test_evaluation_error_aborts_with_context() {
        let problem = Explodes {
            after: std::sync::atomic::AtomicUsize::new(25),
        };
        let err = IbeaRunner::run(&problem, &small_config()).unwrap_err();
        assert_eq!(err.generation, 1);
        assert_eq!(err.evaluations, 25);
        assert_eq!(
            err.source,
            IbeaError::Evaluation(EvaluationError::Failed("simulator crashed".into()))
        );
    }

    /// Variation that escapes the bounds.
    struct OutOfBounds;

    impl Variation for OutOfBounds {
        fn offspring<R: Rng>(
            &self,
            parent1: &Solution,
            _parent2: &Solution,
            _bounds: &[(f64, f64)],
            _rng: &mut R,
        ) -> Solution {
            let mut x = parent1.variables().to_vec();
            x[0] += 10.0;
            Solution::new(x)
        }
    }

    #[test]
    fn test_out_of_bounds_offspring_aborts() {
        let err = IbeaRunner::run_with(
            &LinearBiObjective,
            &OutOfBounds,
            &mut AdditiveEpsilon,
            &small_config(),
        )
        .unwrap_err();
        assert_eq!(err.generation, 1);
        assert_eq!(err.evaluations, 20);
        assert!(matches!(
            err.source,
            IbeaError::Evaluation(EvaluationError::OutOfBounds { index: 0, .. })
        ));
    }
}
