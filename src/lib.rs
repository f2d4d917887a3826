//! procbench - process and thread creation demos
//!
//! Small demonstrations of process and thread creation on a POSIX system, used
//! to compare the cost of each.
//!
//! # Architecture
//!
//! - **Sample**: one fixed-size array of random integers, read-only once built
//! - **Reducers**: mean, median and standard deviation as pure functions
//! - **Worker pools**: run each reducer on its own thread or child process
//! - **Coordinator**: dispatches reducers, collects tagged results, times the run
//! - **Process tree**: a fixed two-level tree of processes running shell commands

pub mod config;
pub mod coordinator;
pub mod output;
pub mod sample;
pub mod stats;
pub mod tree;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Report, RunMode};
pub use worker::{WorkerError, WorkerPool};

/// Result type used throughout procbench
pub type Result<T> = anyhow::Result<T>;
