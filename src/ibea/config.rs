//! IBEA configuration.
//!
//! [`IbeaConfig`] holds all parameters that control the search loop.

use super::indicator::IndicatorKind;

/// Configuration for IBEA.
///
/// Controls population and archive sizes, the evaluation budget, variation
/// operator knobs, the indicator and its scaling factor.
///
/// # Defaults
///
/// ```
/// use u_ibea::ibea::IbeaConfig;
///
/// let config = IbeaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.archive_size, 100);
/// assert_eq!(config.max_evaluations, 25_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_ibea::ibea::{IbeaConfig, IndicatorKind};
///
/// let config = IbeaConfig::default()
///     .with_population_size(50)
///     .with_archive_size(50)
///     .with_max_evaluations(10_000)
///     .with_kappa(0.05)
///     .with_indicator(IndicatorKind::Hypervolume)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IbeaConfig {
    /// Number of offspring produced per generation, and the size of the
    /// initial population.
    pub population_size: usize,

    /// Capacity of the archive kept across generations.
    pub archive_size: usize,

    /// Evaluation budget. Checked at generation boundaries, so the final
    /// count may exceed it by up to one generation of offspring.
    pub max_evaluations: usize,

    /// Probability of recombining a parent pair (0.0–1.0).
    pub crossover_probability: f64,

    /// SBX distribution index. Higher values keep children closer to parents.
    pub crossover_distribution_index: f64,

    /// Per-variable mutation probability (0.0–1.0).
    ///
    /// `None` uses `1 / number_of_variables`.
    pub mutation_probability: Option<f64>,

    /// Polynomial mutation distribution index.
    pub mutation_distribution_index: f64,

    /// Fitness scaling factor κ. Smaller values sharpen the penalty for
    /// being outperformed.
    pub kappa: f64,

    /// Quality indicator used for fitness assignment.
    pub indicator: IndicatorKind,

    /// Whether to evaluate batches in parallel.
    ///
    /// Only effective with the `parallel` feature. Results are identical to
    /// sequential evaluation because evaluation draws no randomness.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for IbeaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            archive_size: 100,
            max_evaluations: 25_000,
            crossover_probability: 0.9,
            crossover_distribution_index: 20.0,
            mutation_probability: None,
            mutation_distribution_index: 20.0,
            kappa: 0.05,
            indicator: IndicatorKind::default(),
            parallel: false,
            seed: None,
        }
    }
}

impl IbeaConfig {
    /// Sets the population (offspring) size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the archive capacity.
    pub fn with_archive_size(mut self, n: usize) -> Self {
        self.archive_size = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the SBX distribution index.
    pub fn with_crossover_distribution_index(mut self, eta: f64) -> Self {
        self.crossover_distribution_index = eta;
        self
    }

    /// Sets a fixed per-variable mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = Some(p.clamp(0.0, 1.0));
        self
    }

    /// Sets the polynomial mutation distribution index.
    pub fn with_mutation_distribution_index(mut self, eta: f64) -> Self {
        self.mutation_distribution_index = eta;
        self
    }

    /// Sets the fitness scaling factor κ.
    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Sets the quality indicator.
    pub fn with_indicator(mut self, indicator: IndicatorKind) -> Self {
        self.indicator = indicator;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Mutation probability for a problem with `number_of_variables`
    /// variables.
    pub fn effective_mutation_probability(&self, number_of_variables: usize) -> f64 {
        self.mutation_probability
            .unwrap_or_else(|| 1.0 / number_of_variables.max(1) as f64)
    }

    /// Preset for fast optimization: small population, short budget.
    ///
    /// - Population / archive: 40, Evaluations: 4 000
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            archive_size: 40,
            max_evaluations: 4_000,
            ..Self::default()
        }
    }

    /// Preset for balanced optimization (the default sizes).
    ///
    /// - Population / archive: 100, Evaluations: 25 000
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for quality optimization: large archive, long budget.
    ///
    /// - Population: 100, Archive: 200, Evaluations: 100 000
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            archive_size: 200,
            max_evaluations: 100_000,
            ..Self::default()
        }
    }

    /// Automatically selects a preset based on the number of decision
    /// variables.
    ///
    /// - `number_of_variables < 10` → [`fast()`](Self::fast)
    /// - `10 ≤ number_of_variables < 50` → [`balanced()`](Self::balanced)
    /// - `number_of_variables ≥ 50` → [`quality()`](Self::quality)
    pub fn auto_select(number_of_variables: usize) -> Self {
        if number_of_variables < 10 {
            Self::fast()
        } else if number_of_variables < 50 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size == 0 {
            return Err("population_size must be at least 1".into());
        }
        if self.archive_size == 0 {
            return Err("archive_size must be at least 1".into());
        }
        if self.max_evaluations == 0 {
            return Err("max_evaluations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err("crossover_probability must be in [0, 1]".into());
        }
        if let Some(p) = self.mutation_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err("mutation_probability must be in [0, 1]".into());
            }
        }
        if !(self.crossover_distribution_index >= 0.0) {
            return Err("crossover_distribution_index must be non-negative".into());
        }
        if !(self.mutation_distribution_index >= 0.0) {
            return Err("mutation_distribution_index must be non-negative".into());
        }
        if !(self.kappa > 0.0 && self.kappa.is_finite()) {
            return Err("kappa must be positive and finite".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IbeaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.archive_size, 100);
        assert_eq!(config.max_evaluations, 25_000);
        assert!((config.crossover_probability - 0.9).abs() < 1e-10);
        assert!((config.crossover_distribution_index - 20.0).abs() < 1e-10);
        assert!(config.mutation_probability.is_none());
        assert!((config.mutation_distribution_index - 20.0).abs() < 1e-10);
        assert!((config.kappa - 0.05).abs() < 1e-10);
        assert_eq!(config.indicator, IndicatorKind::AdditiveEpsilon);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = IbeaConfig::default()
            .with_population_size(20)
            .with_archive_size(30)
            .with_max_evaluations(2_000)
            .with_crossover_probability(1.5)
            .with_mutation_probability(0.25)
            .with_kappa(0.1)
            .with_seed(7);

        assert_eq!(config.population_size, 20);
        assert_eq!(config.archive_size, 30);
        assert_eq!(config.max_evaluations, 2_000);
        assert!((config.crossover_probability - 1.0).abs() < 1e-10); // clamped
        assert_eq!(config.mutation_probability, Some(0.25));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_effective_mutation_probability() {
        let config = IbeaConfig::default();
        assert!((config.effective_mutation_probability(4) - 0.25).abs() < 1e-12);
        let config = config.with_mutation_probability(0.5);
        assert!((config.effective_mutation_probability(4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_presets_valid() {
        for config in [
            IbeaConfig::fast(),
            IbeaConfig::balanced(),
            IbeaConfig::quality(),
            IbeaConfig::auto_select(3),
            IbeaConfig::auto_select(30),
            IbeaConfig::auto_select(300),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
        assert_eq!(IbeaConfig::auto_select(3), IbeaConfig::fast());
        assert_eq!(IbeaConfig::auto_select(300), IbeaConfig::quality());
    }

    #[test]
    fn test_validation_errors() {
        assert!(IbeaConfig::default().with_population_size(0).validate().is_err());
        assert!(IbeaConfig::default().with_archive_size(0).validate().is_err());
        assert!(IbeaConfig::default().with_max_evaluations(0).validate().is_err());
        assert!(IbeaConfig::default().with_kappa(0.0).validate().is_err());
        assert!(IbeaConfig::default().with_kappa(f64::NAN).validate().is_err());
        assert!(IbeaConfig::default()
            .with_crossover_distribution_index(-1.0)
            .validate()
            .is_err());
        assert!(IbeaConfig::default()
            .with_mutation_distribution_index(f64::NAN)
            .validate()
            .is_err());

        let mut config = IbeaConfig::default();
        config.mutation_probability = Some(2.0);
        assert!(config.validate().is_err());
    }
}
