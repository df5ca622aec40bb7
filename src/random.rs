//! Seedable random source shared by every operator of a run.
//!
//! The runner creates one generator per run and threads it by `&mut`
//! through mating selection, crossover and mutation, in that order. The
//! call order is part of the reproducibility contract: the same seed and
//! the same order give the same archive.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
///
/// # Example
///
/// ```
/// use rand::Rng;
/// use u_ibea::random::create_rng;
///
/// let mut a = create_rng(7);
/// let mut b = create_rng(7);
/// assert_eq!(a.random::<u64>(), b.random::<u64>());
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from fresh entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => create_rng(s),
        None => create_rng(rand::random()),
    }
}
