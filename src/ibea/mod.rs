//! Indicator-Based Evolutionary Algorithm (IBEA).
//!
//! A multi-objective evolutionary optimizer whose selection pressure comes
//! from a binary quality indicator instead of Pareto ranking. Users define
//! their problem by implementing [`Problem`]; all objectives are minimized.
//!
//! # Core Traits
//!
//! - [`Problem`]: Decision-variable bounds and objective evaluation
//! - [`Indicator`]: Binary quality indicator `I(a, b)`
//! - [`Variation`]: Produces an offspring from two parents
//!
//! # Key Types
//!
//! - [`IbeaConfig`]: Algorithm parameters (sizes, budget, κ, presets)
//! - [`IbeaRunner`]: Executes the search loop
//! - [`IbeaResult`]: Final archive with statistics
//!
//! # Submodules
//!
//! - [`fitness`]: Indicator-based fitness assignment
//! - [`environmental`]: Archive truncation with incremental fitness update
//! - [`selection`]: Binary tournament and roulette-wheel mating selection
//! - [`indicator`]: Additive ε and hypervolume indicators
//! - [`operators`]: SBX crossover and polynomial mutation
//! - [`multi_objective`]: Pareto dominance and non-dominated sorting
//! - [`problems`]: Benchmark problems with known fronts
//!
//! # References
//!
//! - Zitzler & Künzli (2004), *Indicator-Based Selection in Multiobjective Search*
//! - Deb & Agrawal (1995), *Simulated Binary Crossover for Continuous Search Space*
//! - Zitzler, Deb & Thiele (2000), *Comparison of Multiobjective Evolutionary
//!   Algorithms: Empirical Results*

mod config;
pub mod environmental;
pub mod fitness;
pub mod indicator;
pub mod multi_objective;
pub mod operators;
pub mod problems;
mod runner;
pub mod selection;
mod types;

pub use config::IbeaConfig;
pub use environmental::environmental_selection;
pub use fitness::{assign_fitness, IndicatorFitness};
pub use indicator::{AdditiveEpsilon, Hypervolume, Indicator, IndicatorKind};
pub use operators::{Variation, VariationPipeline};
pub use runner::{GenerationStats, IbeaResult, IbeaRunner};
pub use selection::{BinaryTournament, FitnessComparator, RouletteWheelSelection};
pub use types::{evaluate_solution, Problem, Solution, FITNESS};
