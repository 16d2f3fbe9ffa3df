//! Deterministic per-permutation seeding

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Counter-based seed derivation using SplitMix64
///
/// Maps `(base_seed, counter)` to a well-mixed 64-bit seed, so permutation
/// `i` always gets the same generator regardless of which worker runs it.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Generator for permutation `index` of a run seeded with `base_seed`
pub fn permutation_rng(base_seed: u64, index: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(counter_rng_seed(base_seed, index))
}
