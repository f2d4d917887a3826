//! Human-readable text output

use crate::coordinator::{Report, RunMode};
use crate::util::time::format_millis;
use std::io::{self, Write};

fn describe(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Single => "1 process, sequential",
        RunMode::Processes => "3 worker processes, shared result pipe",
        RunMode::Threads => "3 worker threads",
    }
}

/// Write a report
///
/// Prints the variant, the three statistics, and the measured durations. The
/// launch line is omitted for the sequential baseline.
pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "Run with {} ({})", describe(report.mode), report.mode)?;
    writeln!(out, "Sample size: {} values", report.sample_len)?;
    writeln!(out, "Host CPUs:   {}", num_cpus::get())?;
    writeln!(out)?;

    let stats = &report.statistics;
    writeln!(out, "Mean:          {}", stats.mean)?;
    writeln!(out, "Median:        {}", stats.median)?;
    writeln!(out, "Std deviation: {}", stats.std_dev)?;

    writeln!(out, "--- Timing ---")?;
    writeln!(out, "Total time:         {}", format_millis(report.timing.total))?;
    if let Some(launch) = report.timing.launch {
        writeln!(out, "Worker launch time: {}", format_millis(launch))?;
    }

    Ok(())
}

/// Print a report to stdout
pub fn print_report(report: &Report) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report)?;
    out.flush()
}
