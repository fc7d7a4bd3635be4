//! Deterministic RNG for workload generation.
//!
//! Backed by `rand`'s `SmallRng`, which is fast and reproducible for a given
//! seed. Not cryptographically secure.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded random number generator.
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: SmallRng,
}

impl SimRng {
    /// Creates a new RNG from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.r#gen()
    }

    pub fn next_bool(&mut self) -> bool {
        self.inner.r#gen()
    }

    /// Generates a random `f64` in `[0.0, 1.0)`.
    pub fn next_f64(&mut self) -> f64 {
        self.inner.r#gen()
    }

    /// Generates a random `usize` in `[0, max)`. Returns 0 when `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        if max == 0 {
            0
        } else {
            self.inner.gen_range(0..max)
        }
    }

    /// Generates a random `i64` in `[low, high]`.
    pub fn next_i64_inclusive(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            low
        } else {
            self.inner.gen_range(low..=high)
        }
    }

    /// Picks one element of a non-empty slice.
    pub fn choose<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.next_usize(items.len())]
    }

    /// Forks an independent stream deterministically derived from this one.
    pub fn fork(&mut self) -> Self {
        Self::new(self.next_u64())
    }
}
