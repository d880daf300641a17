//! Integration tests for the multidrill CLI

use assert_cmd::Command;
use multidrill::config::DrillConfig;
use multidrill::parallel::{ProcessPool, Task, WorkerProgram};
use multidrill::strategy::Strategy;
use predicates::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn worker_program() -> WorkerProgram {
    WorkerProgram::new(env!("CARGO_BIN_EXE_multidrill"))
}

fn fast_config(latency_ms: u64) -> DrillConfig {
    DrillConfig {
        simulated_latency_ms: latency_ms,
        ..DrillConfig::default()
    }
}

fn square_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| line.starts_with("Square of "))
        .map(str::to_string)
        .collect()
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("threadpool"))
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("Serve process-pool tasks").not());
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("multidrill"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_sequential_runner_output() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    let assert = cmd
        .args(["sequential", "--items", "1,2,3", "--latency-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "APPROACH 1: Sequential (No Parallelism)",
        ))
        .stdout(predicate::str::contains("[TIME] Total Time: "))
        .stdout(predicate::str::contains("[INFO] Items processed: 3"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(
        square_lines(&stdout),
        vec!["Square of 1 = 1", "Square of 2 = 4", "Square of 3 = 9"]
    );
}

#[test]
fn test_threadpool_runner_keeps_input_order() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    let assert = cmd
        .args(["threadpool", "--latency-ms", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ThreadPool (14 threads)"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let expected: Vec<String> = (1..=14u64)
        .map(|n| format!("Square of {} = {}", n, n * n))
        .collect();
    assert_eq!(square_lines(&stdout), expected);
}

#[test]
fn test_process_pool_strategy_runs_in_batches() {
    let config = fast_config(150);
    let start = Instant::now();
    let run = Strategy::ProcessPool.run(&config, &worker_program()).unwrap();
    let elapsed = start.elapsed();

    let items: Vec<u64> = run.results.iter().map(|r| r.item).collect();
    assert_eq!(items, (1..=14).collect::<Vec<_>>());
    assert!(run.results.iter().all(|r| r.square == u128::from(r.item).pow(2)));
    assert!(run.results.iter().all(|r| r.pid.is_none()));

    // ceil(14 / 3) = 5 rounds, well short of 14 sequential waits
    assert!(elapsed >= Duration::from_millis(5 * 150), "took {elapsed:?}");
    assert!(elapsed < Duration::from_millis(14 * 150), "took {elapsed:?}");
}

#[test]
fn test_hybrid_strategy_groups_by_chunk() {
    let config = fast_config(150);
    let run = Strategy::Hybrid.run(&config, &worker_program()).unwrap();

    let items: Vec<u64> = run.results.iter().map(|r| r.item).collect();
    assert_eq!(items, (1..=14).collect::<Vec<_>>());

    let pids: Vec<u32> = run.results.iter().map(|r| r.pid.unwrap()).collect();
    // Chunks of 5, 5, 4, each from its own process
    assert!(pids[0..5].iter().all(|pid| *pid == pids[0]));
    assert!(pids[5..10].iter().all(|pid| *pid == pids[5]));
    assert!(pids[10..14].iter().all(|pid| *pid == pids[10]));

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for pid in &pids {
        *counts.entry(*pid).or_default() += 1;
    }
    let mut sizes: Vec<usize> = counts.values().copied().collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![4, 5, 5]);
    assert!(!counts.contains_key(&std::process::id()));

    // Two rounds of three threads per chunk
    assert!(run.elapsed >= Duration::from_millis(2 * 150));
    assert!(run.elapsed < Duration::from_millis(14 * 150));
}

#[test]
fn test_hybrid_with_enough_threads_takes_one_wait() {
    let config = DrillConfig {
        simulated_latency_ms: 300,
        chunk_thread_pool_size: 5,
        ..DrillConfig::default()
    };
    let run = Strategy::Hybrid.run(&config, &worker_program()).unwrap();
    assert_eq!(run.results.len(), 14);
    assert!(run.elapsed >= Duration::from_millis(300));
    assert!(run.elapsed < Duration::from_millis(2 * 300 + 500), "took {:?}", run.elapsed);
}

#[test]
fn test_process_pool_map_and_shutdown() {
    let mut pool = ProcessPool::spawn(2, &worker_program()).unwrap();
    assert_eq!(pool.size(), 2);

    let replies = pool
        .map(vec![Task::single(2, 0), Task::chunk(vec![3, 4], 2, 0)])
        .unwrap();
    assert_eq!(replies[0][0].square, 4);
    assert_eq!(
        replies[1].iter().map(|r| r.square).collect::<Vec<_>>(),
        vec![9, 16]
    );
    // Chunk tasks are tagged with the worker's pid
    assert!(replies[1].iter().all(|r| r.pid.is_some()));

    pool.shutdown().unwrap();
}

#[cfg(unix)]
#[test]
fn test_process_pool_worker_exiting_early_fails_the_map() {
    // `true` ignores the worker argument and exits without replying
    let program = WorkerProgram::new("/bin/true");
    let mut pool = ProcessPool::spawn(2, &program).unwrap();

    let start = Instant::now();
    let err = pool
        .map((1..=4).map(|n| Task::single(n, 0)).collect())
        .unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(10));

    let message = format!("{err:#}").to_lowercase();
    assert!(message.contains("worker process"), "error: {message}");

    // Every worker is still reaped
    pool.shutdown().unwrap();
}

#[cfg(unix)]
#[test]
fn test_process_pool_surfaces_worker_error_reply() {
    let program = WorkerProgram::with_args(
        "/bin/sh",
        ["-c", r#"read -r task; echo '{"error":"chunk rejected"}'"#],
    );
    let mut pool = ProcessPool::spawn(1, &program).unwrap();

    let err = pool
        .map(vec![Task::single(1, 0), Task::single(2, 0)])
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed: chunk rejected"), "error: {message}");

    pool.shutdown().unwrap();
}

#[test]
fn test_process_pool_squares_items_past_u32() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.args(["processpool", "--items", "4294967296,2", "--latency-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Square of 4294967296 = 18446744073709551616",
        ))
        .stdout(predicate::str::contains("Square of 2 = 4"))
        .stdout(predicate::str::contains("[INFO] Items processed: 2"));
}

#[test]
fn test_process_pool_keeps_every_item_across_batches() {
    let config = DrillConfig {
        items: (1..=10).collect(),
        simulated_latency_ms: 0,
        process_pool_size: 3,
        ..DrillConfig::default()
    };
    let run = Strategy::ProcessPool.run(&config, &worker_program()).unwrap();
    let items: Vec<u64> = run.results.iter().map(|r| r.item).collect();
    assert_eq!(items, (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_worker_mode_speaks_json_lines() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.arg("worker")
        .write_stdin("{\"items\":[6,7],\"threads\":1,\"latency_ms\":0}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"results":[{"item":6,"square":36,"pid":null},{"item":7,"square":49,"pid":null}]}"#,
        ));
}

#[test]
fn test_compare_prints_final_table() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    let assert = cmd
        .args(["compare", "--latency-ms", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FINAL COMPARISON"))
        .stdout(predicate::str::contains("Sequential (No Parallelism)"))
        .stdout(predicate::str::contains("ThreadPool (14 threads)"))
        .stdout(predicate::str::contains("ProcessPool (3 processes)"))
        .stdout(predicate::str::contains("Hybrid (3 proc x 3 threads)"))
        .stdout(predicate::str::contains("(failed)").not());

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let baseline_row = stdout
        .lines()
        .rfind(|line| line.starts_with("Sequential (No Parallelism)"))
        .unwrap();
    assert!(baseline_row.ends_with("1.0x"), "row: {baseline_row}");

    // Every runner's 14 results made it into the captured output
    assert_eq!(square_lines(&stdout).len(), 4 * 14);
}

#[test]
fn test_compare_is_the_default_command() {
    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.args(["--items", "1,2", "--latency-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FINAL COMPARISON"))
        .stdout(predicate::str::contains("Task: Compute square of 2 numbers"));
}

#[test]
fn test_config_show_with_custom_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("drill.toml");
    fs::write(&config_path, "thread_pool_size = 4\nitems = [1, 2, 3]\n").unwrap();

    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("thread_pool_size = 4"))
        .stdout(predicate::str::contains("process_pool_size = 3"));
}

#[test]
fn test_repository_config_and_env_layers() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("multidrill.toml"),
        "process_pool_size = 2\nchunk_process_count = 2\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("MULTIDRILL_CHUNK_PROCESS_COUNT", "5")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("process_pool_size = 2"))
        .stdout(predicate::str::contains("chunk_process_count = 5"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("drill.toml");
    fs::write(&config_path, "thread_pool_size = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "validate", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("thread_pool_size"));
}

#[test]
fn test_config_validate_reports_effective_values() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("multidrill").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "validate", "--latency-ms", "250"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("250 ms"))
        .stdout(predicate::str::contains("3 processes x 3 threads"));
}
