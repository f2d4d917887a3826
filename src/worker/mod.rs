//! Worker pools
//!
//! A worker computes one statistic over the sample in its own execution context
//! and reports a single tagged result back to the coordinator. This module
//! defines the abstraction the coordinator drives and the error type shared by
//! every pool.
//!
//! # Pools
//!
//! - **thread**: one OS thread per reducer, results over a crossbeam channel
//! - **process**: one child process per reducer, results over a shared pipe
//! - **mock**: scripted in-memory pool for coordinator tests
//!
//! # Lifecycle
//!
//! 1. `spawn()` once per [`StatKind`]
//! 2. `recv()` until every kind has reported (or the pool reports `None`)
//! 3. `join()` to wait for every worker to exit
//!
//! The first call to `recv()` or `join()` closes the pool to further spawns.

pub mod mock;
pub mod process;
pub mod protocol;
pub mod thread;

use crate::coordinator::RunMode;
use crate::sample::Sample;
use crate::stats::{StatKind, StatResult};
use std::io;
use thiserror::Error;

/// Errors raised while dispatching workers and collecting their results
#[derive(Debug, Error)]
pub enum WorkerError {
    /// A worker could not be created. Fatal, never retried.
    #[error("failed to spawn {kind} worker")]
    Spawn {
        kind: StatKind,
        #[source]
        source: io::Error,
    },

    #[error("worker pool is closed to new workers")]
    Closed,

    #[error("received a second {0} result")]
    Duplicate(StatKind),

    #[error("workers hung up without reporting: {}", join_kinds(.0))]
    Missing(Vec<StatKind>),

    #[error("{0} worker panicked")]
    Panicked(StatKind),

    #[error("{kind} worker exited with {status}")]
    Exited {
        kind: StatKind,
        status: std::process::ExitStatus,
    },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("result pipe I/O failed")]
    Io(#[from] io::Error),
}

fn join_kinds(kinds: &[StatKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A set of concurrent reducer workers
///
/// Implementations own the result channel: workers write into it, the
/// coordinator reads from it through [`WorkerPool::recv`]. Results may arrive
/// in any order.
pub trait WorkerPool {
    /// Which variant this pool implements
    fn mode(&self) -> RunMode;

    /// Launch one worker computing `kind` over `sample`
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Spawn`] if the worker could not be created.
    fn spawn(&mut self, kind: StatKind, sample: &Sample) -> Result<(), WorkerError>;

    /// Block until the next result arrives
    ///
    /// Returns `Ok(None)` once every worker has released its end of the
    /// channel and nothing is left to read.
    fn recv(&mut self) -> Result<Option<StatResult>, WorkerError>;

    /// Wait for every launched worker to exit
    fn join(&mut self) -> Result<(), WorkerError>;
}
