//! Thread-per-reducer pool
//!
//! Each reducer runs on its own named OS thread. Threads hold a clone of the
//! sample's `Arc` and a clone of the channel sender; the only thing they ever
//! produce is one [`StatResult`] on that channel. Nothing is written to shared
//! state, so no locking is needed.

use super::{WorkerError, WorkerPool};
use crate::coordinator::RunMode;
use crate::sample::Sample;
use crate::stats::{StatKind, StatResult};
use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, warn};
use std::thread::{Builder, JoinHandle};

/// Pool that runs every reducer on its own thread
pub struct ThreadPool {
    /// Coordinator's copy of the sender, dropped when collection starts
    tx: Option<Sender<StatResult>>,
    rx: Receiver<StatResult>,
    handles: Vec<(StatKind, JoinHandle<()>)>,
}

impl ThreadPool {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            tx: Some(tx),
            rx,
            handles: Vec::with_capacity(StatKind::ALL.len()),
        }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerPool for ThreadPool {
    fn mode(&self) -> RunMode {
        RunMode::Threads
    }

    fn spawn(&mut self, kind: StatKind, sample: &Sample) -> Result<(), WorkerError> {
        let tx = self.tx.as_ref().ok_or(WorkerError::Closed)?.clone();
        let sample = sample.clone();

        let handle = Builder::new()
            .name(format!("reducer-{}", kind))
            .spawn(move || {
                if let Some(value) = kind.compute(sample.values()) {
                    if tx.send(StatResult::new(kind, value)).is_err() {
                        debug!("{} result dropped, receiver is gone", kind);
                    }
                }
            })
            .map_err(|source| WorkerError::Spawn { kind, source })?;

        debug!("spawned {} worker thread", kind);
        self.handles.push((kind, handle));
        Ok(())
    }

    fn recv(&mut self) -> Result<Option<StatResult>, WorkerError> {
        // Without this the channel never disconnects
        self.tx.take();
        Ok(self.rx.recv().ok())
    }

    fn join(&mut self) -> Result<(), WorkerError> {
        self.tx.take();

        let mut first_err = None;
        for (kind, handle) in self.handles.drain(..) {
            if handle.join().is_err() && first_err.is_none() {
                first_err = Some(WorkerError::Panicked(kind));
            }
            debug!("joined {} worker thread", kind);
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            if let Err(e) = self.join() {
                warn!("failed to join worker threads: {}", e);
            }
        }
    }
}
