//! Coordinator module
//!
//! Dispatches the reducers to a [`WorkerPool`], collects one tagged result per
//! kind, waits for every worker, and times the run.
//!
//! Two intervals are measured:
//!
//! - **launch**: from just before the first spawn until the last spawn returns
//! - **total**: from just before the first spawn until every worker is joined
//!
//! Timing is observational only; it never influences what is collected.

use crate::sample::Sample;
use crate::stats::collector::ResultCollector;
use crate::stats::{self, StatKind, Statistics};
use crate::worker::{WorkerError, WorkerPool};
use crate::Result;
use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Which variant produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Sequential baseline on the calling thread
    Single,
    /// One child process per reducer
    Processes,
    /// One thread per reducer
    Threads,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Single => write!(f, "single"),
            RunMode::Processes => write!(f, "processes"),
            RunMode::Threads => write!(f, "threads"),
        }
    }
}

/// Durations measured around a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Worker launch time; `None` for the sequential baseline
    pub launch: Option<Duration>,
    pub total: Duration,
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mode: RunMode,
    pub sample_len: usize,
    pub statistics: Statistics,
    pub timing: Timing,
}

/// Run the three reducers concurrently on `pool`
///
/// Blocks until one result per [`StatKind`] has been collected and every
/// worker has been joined. Results are matched to their kind by tag, so
/// arrival order does not matter.
///
/// # Errors
///
/// - a worker cannot be spawned
/// - a kind reports twice, or the pool hangs up before every kind reported
/// - a worker dies or the result channel is corrupted
///
/// Launched workers are joined before any error is returned.
pub fn run_concurrent<P: WorkerPool + ?Sized>(pool: &mut P, sample: &Sample) -> Result<Report> {
    anyhow::ensure!(!sample.is_empty(), "cannot compute statistics of an empty sample");

    let mode = pool.mode();
    let start = Instant::now();

    for kind in StatKind::ALL {
        if let Err(e) = pool.spawn(kind, sample) {
            if let Err(join_err) = pool.join() {
                warn!("failed to join workers after spawn failure: {}", join_err);
            }
            return Err(e).with_context(|| format!("{} run aborted", mode));
        }
    }
    let launch = start.elapsed();
    debug!("launched {} workers in {:?}", StatKind::ALL.len(), launch);

    let collector = match collect(pool) {
        Ok(collector) => collector,
        Err(e) => {
            if let Err(join_err) = pool.join() {
                warn!("failed to join workers after collection failure: {}", join_err);
            }
            return Err(e).with_context(|| format!("{} run aborted", mode));
        }
    };

    pool.join().context("failed to join workers")?;
    let total = start.elapsed();

    let statistics = collector.finish()?;

    Ok(Report {
        mode,
        sample_len: sample.len(),
        statistics,
        timing: Timing {
            launch: Some(launch),
            total,
        },
    })
}

/// Read results until every kind reported or the pool hangs up
fn collect<P: WorkerPool + ?Sized>(pool: &mut P) -> std::result::Result<ResultCollector, WorkerError> {
    let mut collector = ResultCollector::new();
    while !collector.is_complete() {
        match pool.recv()? {
            Some(result) => {
                debug!("received {} = {}", result.kind, result.value);
                collector.record(result)?;
            }
            None => break,
        }
    }
    Ok(collector)
}

/// Sequential baseline
///
/// Computes mean, median and standard deviation one after another on the
/// calling thread.
pub fn run_sequential(sample: &Sample) -> Result<Report> {
    let start = Instant::now();
    let statistics = stats::compute_all(sample.values())
        .context("cannot compute statistics of an empty sample")?;
    let total = start.elapsed();

    Ok(Report {
        mode: RunMode::Single,
        sample_len: sample.len(),
        statistics,
        timing: Timing { launch: None, total },
    })
}
