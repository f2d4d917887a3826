//! Sample statistics
//!
//! The three reducers computed by the workers, the tag that identifies each of
//! them, and the assembled result of a run.
//!
//! Every reducer is a pure function over a borrowed slice. None of them looks
//! at another reducer's output: [`std_dev`] recomputes the mean itself so the
//! standard-deviation worker never waits on the mean worker.
//!
//! # Example
//!
//! ```
//! use procbench::stats::{self, StatKind};
//!
//! let values = [1, 2, 3, 4];
//! assert_eq!(stats::mean(&values), Some(2.5));
//! assert_eq!(stats::median(&values), Some(2.5));
//!
//! let sd = StatKind::StdDev.compute(&values).unwrap();
//! assert!((sd - 1.118).abs() < 1e-3);
//! ```

pub mod collector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A function computing one statistic over a sample
///
/// Returns `None` only when the sample is empty.
pub type Reducer = fn(&[i32]) -> Option<f64>;

/// Which statistic a worker computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatKind {
    Mean,
    Median,
    StdDev,
}

impl StatKind {
    /// All kinds, in dispatch order
    pub const ALL: [StatKind; 3] = [StatKind::Mean, StatKind::Median, StatKind::StdDev];

    /// Position of this kind in [`StatKind::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        match self {
            StatKind::Mean => 0,
            StatKind::Median => 1,
            StatKind::StdDev => 2,
        }
    }

    /// The reducer that computes this statistic
    pub fn reducer(self) -> Reducer {
        match self {
            StatKind::Mean => mean,
            StatKind::Median => median,
            StatKind::StdDev => std_dev,
        }
    }

    /// Run this kind's reducer over `values`
    #[inline]
    pub fn compute(self, values: &[i32]) -> Option<f64> {
        (self.reducer())(values)
    }

    /// Short lowercase name, used for thread names and CLI values
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Mean => "mean",
            StatKind::Median => "median",
            StatKind::StdDev => "std-dev",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statistic value tagged with the kind that produced it
///
/// This is the only thing a worker ever sends back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatResult {
    pub kind: StatKind,
    pub value: f64,
}

impl StatResult {
    pub fn new(kind: StatKind, value: f64) -> Self {
        Self { kind, value }
    }
}

/// The three statistics of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl Statistics {
    /// Value for a given kind
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Mean => self.mean,
            StatKind::Median => self.median,
            StatKind::StdDev => self.std_dev,
        }
    }
}

/// Arithmetic mean
pub fn mean(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let sum: i64 = values.iter().map(|&v| v as i64).sum();
    Some(sum as f64 / values.len() as f64)
}

/// Median of a private sorted copy
///
/// The average of the two middle elements when the length is even. The input
/// slice is left untouched.
pub fn median(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Population standard deviation
///
/// The mean is recomputed here rather than passed in.
pub fn std_dev(values: &[i32]) -> Option<f64> {
    let local_mean = mean(values)?;

    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - local_mean;
            d * d
        })
        .sum();

    Some((sum_sq / values.len() as f64).sqrt())
}

/// Compute all three statistics on the calling thread
///
/// Mean, then median, then standard deviation.
pub fn compute_all(values: &[i32]) -> Option<Statistics> {
    Some(Statistics {
        mean: mean(values)?,
        median: median(values)?,
        std_dev: std_dev(values)?,
    })
}
