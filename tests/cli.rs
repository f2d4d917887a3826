//! End-to-end tests against the built binary
//!
//! The process pool and the process tree re-execute the binary, so they can
//! only be exercised here.

use procbench::coordinator::{self, RunMode};
use procbench::output::json::JsonReport;
use procbench::sample::{Sample, SampleGenerator, SampleRange};
use procbench::stats::{self, StatKind};
use procbench::worker::process::ProcessPool;
use procbench::worker::WorkerError;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_procbench");

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env_remove("PROCBENCH_SEED")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run procbench")
}

fn run_json(mode: &str, seed: u64) -> JsonReport {
    let seed = seed.to_string();
    let output = run(&["--mode", mode, "--seed", &seed, "--json"]);
    assert!(
        output.status.success(),
        "{} run failed: {}",
        mode,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not a JSON report")
}

#[test]
fn test_every_variant_matches_reference() {
    let sample = SampleGenerator::with_seed(SampleRange::default(), 42).generate(10_000);
    let expected = stats::compute_all(sample.values()).unwrap();

    for (mode, run_mode) in [
        ("single", RunMode::Single),
        ("threads", RunMode::Threads),
        ("processes", RunMode::Processes),
    ] {
        let report = run_json(mode, 42);
        assert_eq!(report.mode, run_mode);
        assert_eq!(report.sample_len, 10_000);
        for kind in StatKind::ALL {
            let (got, want) = (report.statistics.get(kind), expected.get(kind));
            assert!((got - want).abs() < 1e-9, "{} {}: got {}, want {}", mode, kind, got, want);
        }
        assert!((0.0..=100.0).contains(&report.statistics.mean));
        assert!(report.statistics.std_dev >= 0.0);
    }
}

#[test]
fn test_launch_time_reported_for_concurrent_variants() {
    assert!(run_json("single", 1).timing.launch_ms.is_none());

    for mode in ["threads", "processes"] {
        let timing = run_json(mode, 1).timing;
        let launch = timing.launch_ms.expect("launch time missing");
        assert!(launch >= 0.0 && launch <= timing.total_ms);
    }
}

#[test]
fn test_text_output() {
    let output = run(&["--mode", "processes", "-n", "1001", "--seed", "3"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Sample size: 1001 values"));
    assert!(stdout.contains("Mean:"));
    assert!(stdout.contains("Median:"));
    assert!(stdout.contains("Std deviation:"));
    assert!(stdout.contains("Total time:"));
    assert!(stdout.contains("Worker launch time:"));
}

#[test]
fn test_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sample]\nlen = 4\nmin = 7\nmax = 7\n\n[output]\njson = true").unwrap();

    let output = run(&["--mode", "threads", "--config", file.path().to_str().unwrap()]);
    assert!(output.status.success());

    let report: JsonReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.sample_len, 4);
    assert_eq!(report.statistics.mean, 7.0);
    assert_eq!(report.statistics.median, 7.0);
    assert_eq!(report.statistics.std_dev, 0.0);
}

#[test]
fn test_invalid_config_exits_nonzero() {
    let output = run(&["--mode", "single", "--min", "10", "--max", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must not exceed"));
}

#[test]
fn test_process_pool_scenario() {
    let sample = Sample::from_values(vec![1, 2, 3, 4]);
    let mut pool = ProcessPool::with_program(BIN).unwrap();

    let report = coordinator::run_concurrent(&mut pool, &sample).unwrap();

    assert_eq!(report.mode, RunMode::Processes);
    assert_eq!(report.statistics.mean, 2.5);
    assert_eq!(report.statistics.median, 2.5);
    assert!((report.statistics.std_dev - 1.118).abs() < 1e-3);
}

#[test]
fn test_process_pool_spawn_failure() {
    let sample = Sample::from_values(vec![1, 2, 3, 4]);
    let mut pool = ProcessPool::with_program("/nonexistent/procbench").unwrap();

    let err = coordinator::run_concurrent(&mut pool, &sample).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WorkerError>(),
        Some(WorkerError::Spawn { kind: StatKind::Mean, .. })
    ));
}

#[test]
fn test_reducer_mode_round_trip() {
    use procbench::worker::protocol::{self, Message};
    use std::borrow::Cow;

    let mut child = Command::new(BIN)
        .args(["--mode", "reducer", "--stat", "median"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    protocol::write_message(&mut stdin, &Message::Sample(Cow::Borrowed(&[5, 1, 3][..]))).unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    match protocol::read_message(&mut &output.stdout[..]).unwrap() {
        Some(Message::Result(result)) => {
            assert_eq!(result.kind, StatKind::Median);
            assert_eq!(result.value, 3.0);
        }
        other => panic!("expected Result, got {:?}", other),
    }
}

#[test]
fn test_reducer_mode_rejects_garbage() {
    let mut child = Command::new(BIN)
        .args(["--mode", "reducer", "--stat", "mean"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child.stdin.take().unwrap().write_all(b"not a frame").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_process_tree() {
    let output = run(&["--mode", "tree"]);
    assert!(
        output.status.success(),
        "tree failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    for leaf in ["[N1] running command: ls", "[N2] running command: pwd", "[N3] running command: date", "[N4] running command: whoami"] {
        assert!(stdout.contains(leaf), "missing {:?}", leaf);
    }
    for branch in ["F1", "F2"] {
        assert!(stdout.contains(&format!("[{}] process {}.", branch, branch)));
        assert!(stdout.contains(&format!("[{}] parent PID (P1): ", branch)));
    }
    assert!(stdout.contains("[P1] child and grandchild processes finished"));

    // P1 only reports after both branches are done
    let last_branch = stdout.rfind("parent PID (P1)").unwrap();
    let root_done = stdout.find("[P1] process P1.").unwrap();
    assert!(root_done > last_branch);
}
