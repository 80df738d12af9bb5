//! # RandomNumberGenerator
//!
//! Every optimiser draws its randomness through the [`RandomSource`] trait,
//! which is passed explicitly into each run. [`RandomNumberGenerator`] is the
//! default implementation, backed by the `rand` crate's `StdRng`.
//!
//! ## Example
//!
//! ```rust
//! use sosbench::rng::{RandomNumberGenerator, RandomSource};
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let u = rng.uniform();
//! assert!((0.0..1.0).contains(&u));
//!
//! let order = rng.permutation(5);
//! assert_eq!(order.len(), 5);
//! ```

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// The random draws the optimisers need.
///
/// Implementations must be deterministic for a fixed internal state so that
/// runs are reproducible from a seed.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer in `[0, upper_inclusive]`.
    fn integer(&mut self, upper_inclusive: usize) -> usize;

    /// A random ordering of the indices `0..n`.
    fn permutation(&mut self, n: usize) -> Vec<usize>;
}

/// A wrapper around the `rand` crate's `StdRng`.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates an independent generator for one task of a batch.
    ///
    /// The same `(seed, task)` pair always yields the same stream, regardless
    /// of which worker thread runs the task or in what order.
    pub fn for_task(seed: u64, task: u64) -> Self {
        Self::from_seed(mix_seed(seed, task))
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for RandomNumberGenerator {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn integer(&mut self, upper_inclusive: usize) -> usize {
        self.rng.gen_range(0..=upper_inclusive)
    }

    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut self.rng);
        indices
    }
}

// splitmix64 finaliser
fn mix_seed(seed: u64, task: u64) -> u64 {
    let mut z = seed ^ task.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
