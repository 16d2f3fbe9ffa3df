// Permutation generators for cluster-based null distributions
//
// Each call relabels subjects once and returns a fresh pseudo dataset:
// - paired: coin flip per subject swaps its two condition series
// - independent: pooled subjects redrawn into groups of the original sizes
// - one-sample: coin flip per subject reflects its series about the mean
//
// Random state is always injected (any rand::Rng); permutation_rng derives a
// reproducible ChaCha8 stream per permutation index for parallel runs.

mod assign;
mod seed;

pub use assign::{paired_random_assign, random_assign, sign_flip_assign};
pub use seed::{counter_rng_seed, permutation_rng};
