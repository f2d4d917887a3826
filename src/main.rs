//! procbench CLI entry point

use anyhow::{Context, Result};
use log::debug;
use procbench::config::cli::{Cli, ExecutionMode};
use procbench::config::{cli_convert, Config};
use procbench::coordinator::{self, Report, RunMode};
use procbench::output::{json, text};
use procbench::sample::{Sample, SampleGenerator};
use procbench::stats::StatKind;
use procbench::worker::process::{self, ProcessPool};
use procbench::worker::thread::ThreadPool;
use std::fs::File;
use std::io;
use std::os::fd::AsFd;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);
    cli.validate()?;

    match cli.mode {
        ExecutionMode::Tree => {
            let program = std::env::current_exe()
                .context("Failed to get current executable path")?;
            procbench::tree::run_root(&program, cli.debug)
        }
        ExecutionMode::Branch => {
            let branch = cli.branch.context("--branch is required in branch mode")?;
            procbench::tree::run_branch(cli_convert::convert_branch(branch))
        }
        ExecutionMode::Reducer => {
            let stat = cli.stat.context("--stat is required in reducer mode")?;
            run_reducer(cli_convert::convert_stat(stat))
        }
        mode => {
            let run_mode = cli_convert::convert_run_mode(mode)
                .context("not a statistics mode")?;
            run_statistics(&cli, run_mode)
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default level
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Generate the sample, run one variant, print the report
fn run_statistics(cli: &Cli, mode: RunMode) -> Result<()> {
    let config = Config::from_cli(cli)?;
    let sample = generate_sample(&config);
    debug!("generated {} values in [{}, {}]", sample.len(), config.sample.min, config.sample.max);

    let report: Report = match mode {
        RunMode::Single => coordinator::run_sequential(&sample)?,
        RunMode::Threads => coordinator::run_concurrent(&mut ThreadPool::new(), &sample)?,
        RunMode::Processes => {
            let mut pool = ProcessPool::new()
                .context("Failed to create worker result pipe")?
                .forward_debug(cli.debug);
            coordinator::run_concurrent(&mut pool, &sample)?
        }
    };

    if config.output.json {
        json::print_json(&report)?;
    } else {
        text::print_report(&report)?;
    }

    Ok(())
}

fn generate_sample(config: &Config) -> Sample {
    let mut generator = match config.sample.seed {
        Some(seed) => SampleGenerator::with_seed(config.sample.range(), seed),
        None => SampleGenerator::new(config.sample.range()),
    };
    generator.generate(config.sample.len)
}

/// Reducer process: sample on stdin, one result frame on stdout
fn run_reducer(kind: StatKind) -> Result<()> {
    // Write the frame straight to fd 1; the line-buffered Stdout handle would
    // split it at newline bytes
    let stdout = io::stdout()
        .as_fd()
        .try_clone_to_owned()
        .context("Failed to duplicate stdout")?;

    process::serve_reducer(kind, io::stdin().lock(), File::from(stdout))
        .with_context(|| format!("{} worker failed", kind))?;
    Ok(())
}
