//! Seeded random number generation.
//!
//! Every random draw in a run (population init, selection, variation) flows
//! from one [`StdRng`] created here, so a fixed top-level seed reproduces the
//! whole run.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `Some(seed)`, or from OS entropy for `None`.
pub fn rng_from_option(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
