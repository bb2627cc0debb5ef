//! Sources of randomness for endpoints with randomized behavior.
//!
//! Handlers never reach for a global RNG directly. Instead, the [`State`](crate::state::State)
//! carries a [`RandomSource`], which tests can replace to force a specific branch.

use std::fmt;
use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed numbers in `[0, 1)`.
pub trait RandomSource: fmt::Debug + Send + Sync {
    /// Draws the next number from `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// Draws from the thread-local RNG, which is seeded from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::rng().random()
    }
}

/// A deterministic source that produces the same sequence for the same seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<SmallRng>,
}

impl SeededRandom {
    /// Creates a new source from the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        // A poisoned lock still holds a valid RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random()
    }
}

/// Always returns the same value.
///
/// Useful to force a specific branch of a randomized endpoint.
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&self) -> f64 {
        self.0
    }
}
