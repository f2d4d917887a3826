//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Sequential baseline: all statistics on one thread
    Single,
    /// One child process per statistic, results over a pipe (default)
    Processes,
    /// One thread per statistic
    Threads,
    /// Fixed two-level process tree running shell commands
    Tree,
    /// Internal: statistics worker process (spawned by `processes`)
    #[value(hide = true)]
    Reducer,
    /// Internal: first-level node of the process tree (spawned by `tree`)
    #[value(hide = true)]
    Branch,
}

/// Statistic computed by a reducer process
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatArg {
    Mean,
    Median,
    StdDev,
}

/// Process tree branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BranchArg {
    F1,
    F2,
}

/// procbench - process and thread creation timing demos
#[derive(Parser, Debug)]
#[command(name = "procbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which demo to run
    #[arg(long, value_enum, default_value = "processes")]
    pub mode: ExecutionMode,

    // === Sample Options ===
    /// Number of values in the sample [default: 10000]
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Smallest sample value, inclusive [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<i32>,

    /// Largest sample value, inclusive [default: 100]
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<i32>,

    /// Seed for a reproducible sample (random if unset)
    #[arg(long, env = "PROCBENCH_SEED")]
    pub seed: Option<u64>,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // === Output Options ===
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    // === Internal ===
    /// Statistic to compute (reducer mode)
    #[arg(long, value_enum, hide = true)]
    pub stat: Option<StatArg>,

    /// Branch to run (branch mode)
    #[arg(long, value_enum, hide = true)]
    pub branch: Option<BranchArg>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.mode {
            ExecutionMode::Reducer if self.stat.is_none() => {
                anyhow::bail!("--stat is required in reducer mode");
            }
            ExecutionMode::Branch if self.branch.is_none() => {
                anyhow::bail!("--branch is required in branch mode");
            }
            _ => {}
        }

        if let Some(0) = self.samples {
            anyhow::bail!("samples must be at least 1");
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                anyhow::bail!("min ({}) must not exceed max ({})", min, max);
            }
        }

        Ok(())
    }
}
