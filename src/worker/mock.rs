//! Mock worker pool for testing
//!
//! Computes results in memory and hands them back in a scripted order, so
//! coordinator behavior can be tested without threads or processes.
//!
//! # Features
//!
//! - Deliver results in dispatch order or reversed
//! - Fail the spawn of a chosen kind
//! - Silence a worker (it never reports)
//! - Report a kind twice
//!
//! # Example
//!
//! ```
//! use procbench::coordinator;
//! use procbench::sample::Sample;
//! use procbench::worker::mock::MockPool;
//!
//! let sample = Sample::from_values(vec![1, 2, 3, 4]);
//! let mut pool = MockPool::new().reversed();
//!
//! let report = coordinator::run_concurrent(&mut pool, &sample).unwrap();
//! assert_eq!(report.statistics.mean, 2.5);
//! assert!(pool.is_joined());
//! ```

use super::{WorkerError, WorkerPool};
use crate::coordinator::RunMode;
use crate::sample::Sample;
use crate::stats::{StatKind, StatResult};
use std::collections::VecDeque;
use std::io;

/// Scripted in-memory worker pool
#[derive(Debug, Default)]
pub struct MockPool {
    /// Kinds spawned so far, in order
    spawned: Vec<StatKind>,
    /// Results waiting to be received
    pending: VecDeque<StatResult>,
    reverse: bool,
    fail_on: Option<StatKind>,
    silent: Option<StatKind>,
    duplicate: Option<StatKind>,
    joined: bool,
    closed: bool,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver results in reverse dispatch order
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Fail when spawning `kind`
    pub fn fail_on(mut self, kind: StatKind) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// `kind` exits without reporting
    pub fn silence(mut self, kind: StatKind) -> Self {
        self.silent = Some(kind);
        self
    }

    /// `kind` reports twice
    pub fn duplicate(mut self, kind: StatKind) -> Self {
        self.duplicate = Some(kind);
        self
    }

    pub fn spawned(&self) -> &[StatKind] {
        &self.spawned
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }
}

impl WorkerPool for MockPool {
    fn mode(&self) -> RunMode {
        RunMode::Threads
    }

    fn spawn(&mut self, kind: StatKind, sample: &Sample) -> Result<(), WorkerError> {
        if self.closed {
            return Err(WorkerError::Closed);
        }
        if self.fail_on == Some(kind) {
            return Err(WorkerError::Spawn {
                kind,
                source: io::Error::new(io::ErrorKind::WouldBlock, "mock spawn failure"),
            });
        }

        self.spawned.push(kind);
        if self.silent == Some(kind) {
            return Ok(());
        }

        if let Some(value) = kind.compute(sample.values()) {
            let result = StatResult::new(kind, value);
            self.pending.push_back(result);
            if self.duplicate == Some(kind) {
                self.pending.push_back(result);
            }
        }
        Ok(())
    }

    fn recv(&mut self) -> Result<Option<StatResult>, WorkerError> {
        self.closed = true;
        if self.reverse {
            Ok(self.pending.pop_back())
        } else {
            Ok(self.pending.pop_front())
        }
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        self.closed = true;
        self.joined = true;
        Ok(())
    }
}
