//! Random sample generation
//!
//! A [`Sample`] is the fixed array of integers every reducer works on. It is
//! generated once by a [`SampleGenerator`] and is read-only afterwards: threads
//! share it through an `Arc`, child processes receive their own copy.
//!
//! # Performance
//!
//! Uses the xoshiro256++ PRNG, which is fast and has good statistical
//! properties. Seeding from OS entropy is the default; a fixed seed gives a
//! reproducible sample.
//!
//! # Example
//!
//! ```
//! use procbench::sample::{SampleGenerator, SampleRange};
//!
//! let mut gen = SampleGenerator::with_seed(SampleRange::new(0, 100), 42);
//! let sample = gen.generate(10_000);
//!
//! assert_eq!(sample.len(), 10_000);
//! assert!(sample.values().iter().all(|v| (0..=100).contains(v)));
//! ```

use rand::distributions::Uniform;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default number of values in a sample
pub const DEFAULT_SAMPLE_LEN: usize = 10_000;

/// Closed interval `[min, max]` the sample values are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: i32,
    pub max: i32,
}

impl SampleRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for SampleRange {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

/// Immutable sequence of sample values
///
/// Cloning is cheap: clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    values: Arc<[i32]>,
}

impl Sample {
    /// Wrap a fixed set of values
    pub fn from_values(values: Vec<i32>) -> Self {
        Self {
            values: values.into(),
        }
    }

    #[inline]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Uniform random sample generator
///
/// Every value in the range has equal probability, both bounds included.
pub struct SampleGenerator {
    rng: Xoshiro256PlusPlus,
    dist: Uniform<i32>,
}

impl SampleGenerator {
    /// Create a generator seeded from OS entropy
    ///
    /// # Panics
    ///
    /// Panics if `range.min > range.max`; configuration validation rejects
    /// such ranges before a generator is built.
    pub fn new(range: SampleRange) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
            dist: Uniform::new_inclusive(range.min, range.max),
        }
    }

    /// Create a generator with a specific seed
    ///
    /// Useful for reproducible runs and tests.
    pub fn with_seed(range: SampleRange, seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            dist: Uniform::new_inclusive(range.min, range.max),
        }
    }

    /// Generate a sample of `len` values
    pub fn generate(&mut self, len: usize) -> Sample {
        let values: Vec<i32> = (0..len).map(|_| self.rng.sample(&self.dist)).collect();
        Sample::from_values(values)
    }
}
