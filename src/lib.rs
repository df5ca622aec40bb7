//! Indicator-based multi-objective evolutionary optimization.
//!
//! Implements IBEA (Zitzler & Künzli, 2004): candidate solutions are ranked
//! by how much every other population member outperforms them under a
//! binary quality indicator, and the archive is truncated one worst member
//! at a time with incremental fitness updates.
//!
//! - **Fitness assignment**: `F(x) = Σ −exp(−I(y, x) / (c·κ))` with the
//!   additive ε or hypervolume indicator.
//! - **Environmental selection**: exact-size truncation that keeps fitness
//!   consistent with a fresh assignment over the survivors.
//! - **Mating selection**: binary tournament with random tie-breaking, and
//!   fitness-proportional roulette by rejection sampling.
//! - **Search loop**: SBX crossover, polynomial mutation, and an
//!   evaluation budget, all seeded for reproducibility.
//!
//! # Features
//!
//! - `parallel`: evaluate populations with rayon
//! - `serde`: serialize [`ibea::Solution`] and [`ibea::IbeaConfig`]

pub mod error;
pub mod ibea;
pub mod random;
