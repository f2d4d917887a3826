//! JSON output formatting

use crate::coordinator::{Report, RunMode};
use crate::stats::Statistics;
use crate::util::time::as_millis_f64;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Durations in fractional milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTiming {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_ms: Option<f64>,
    pub total_ms: f64,
}

/// Serialized form of a [`Report`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub mode: RunMode,
    pub sample_len: usize,
    pub host_cpus: usize,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub statistics: Statistics,
    pub timing: JsonTiming,
}

impl JsonReport {
    pub fn from_report(report: &Report) -> Self {
        Self {
            mode: report.mode,
            sample_len: report.sample_len,
            host_cpus: num_cpus::get(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            statistics: report.statistics,
            timing: JsonTiming {
                launch_ms: report.timing.launch.map(as_millis_f64),
                total_ms: as_millis_f64(report.timing.total),
            },
        }
    }
}

/// Write a report as pretty-printed JSON followed by a newline
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport::from_report(report))?;
    writeln!(out)?;
    Ok(())
}

/// Print a report to stdout as JSON
pub fn print_json(report: &Report) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, report)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::Timing;
    use std::time::Duration;

    fn report(launch: Option<Duration>) -> Report {
        Report {
            mode: RunMode::Threads,
            sample_len: 10_000,
            statistics: Statistics {
                mean: 50.0421,
                median: 50.0,
                std_dev: 29.17,
            },
            timing: Timing {
                launch,
                total: Duration::from_millis(3),
            },
        }
    }

    #[test]
    fn test_json_fields() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report(Some(Duration::from_micros(250)))).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["mode"], "threads");
        assert_eq!(value["sample_len"], 10_000);
        assert_eq!(value["statistics"]["mean"], 50.0421);
        assert_eq!(value["statistics"]["std_dev"], 29.17);
        assert_eq!(value["timing"]["launch_ms"], 0.25);
        assert_eq!(value["timing"]["total_ms"], 3.0);
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_json_single_omits_launch() {
        let mut buf = Vec::new();
        write_json(&mut buf, &report(None)).unwrap();

        let parsed: JsonReport = serde_json::from_slice(&buf).unwrap();
        assert!(parsed.timing.launch_ms.is_none());
        assert_eq!(parsed.statistics.median, 50.0);
    }
}
