//! Plain-text report a strategy runner prints to stdout
//!
//! The harness captures this text verbatim, so it carries no styling.

use super::{Strategy, StrategyRun};
use crate::config::DrillConfig;
use std::collections::BTreeSet;
use std::fmt::Write;

const BANNER_WIDTH: usize = 50;

/// Banner printed before any result line
pub fn render_header(strategy: Strategy, config: &DrillConfig) -> String {
    let mut out = String::new();
    let rule = "=".repeat(BANNER_WIDTH);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "APPROACH {}: {}",
        strategy.number(),
        strategy.label(config)
    );
    let _ = writeln!(out, "{rule}");
    out
}

/// Timing, count and tips printed after the last result line
pub fn render_summary(run: &StrategyRun, config: &DrillConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "[TIME] Total Time: {:.2} seconds",
        run.elapsed.as_secs_f64()
    );
    let _ = writeln!(out, "[INFO] Items processed: {}", run.results.len());
    for tip in tips(run, config) {
        let _ = writeln!(out, "[TIP]  {tip}");
    }

    out
}

/// The whole report: header, one line per result, summary
pub fn render_report(run: &StrategyRun, config: &DrillConfig) -> String {
    let mut out = render_header(run.strategy, config);
    for result in &run.results {
        let _ = writeln!(out, "{result}");
    }
    out.push_str(&render_summary(run, config));
    out
}

fn tips(run: &StrategyRun, config: &DrillConfig) -> Vec<String> {
    let latency = config.simulated_latency().as_secs_f64();
    let rounds = run.strategy.expected_rounds(config);

    match run.strategy {
        Strategy::Sequential => vec![format!(
            "Each item waited {latency:.2} sec, all ran one-by-one"
        )],
        Strategy::ThreadPool => vec![format!(
            "{} threads waited side by side, ~{} round(s) of {:.2} sec",
            config.thread_pool_size, rounds, latency
        )],
        Strategy::ProcessPool => vec![format!(
            "{} processes, ~{} batches of {:.2} sec each",
            config.process_pool_size, rounds, latency
        )],
        Strategy::Hybrid => {
            let pids: BTreeSet<u32> = run.results.iter().filter_map(|r| r.pid).collect();
            vec![
                format!(
                    "{} processes x {} threads = {} parallel workers",
                    config.chunk_process_count,
                    config.chunk_thread_pool_size,
                    config.chunk_process_count * config.chunk_thread_pool_size
                ),
                format!(
                    "Notice {} different PIDs -- proves separate processes!",
                    pids.len()
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::WorkResult;
    use std::time::Duration;

    fn result(item: u64, pid: Option<u32>) -> WorkResult {
        WorkResult {
            item,
            square: u128::from(item) * u128::from(item),
            pid,
        }
    }

    #[test]
    fn test_sequential_report_layout() {
        let config = DrillConfig {
            items: vec![1, 2],
            ..DrillConfig::default()
        };
        let run = StrategyRun {
            strategy: Strategy::Sequential,
            results: vec![result(1, None), result(2, None)],
            elapsed: Duration::from_millis(4012),
        };

        let report = render_report(&run, &config);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "APPROACH 1: Sequential (No Parallelism)");
        assert_eq!(lines[3], "Square of 1 = 1");
        assert_eq!(lines[4], "Square of 2 = 4");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "[TIME] Total Time: 4.01 seconds");
        assert_eq!(lines[7], "[INFO] Items processed: 2");
        assert_eq!(lines[8], "[TIP]  Each item waited 2.00 sec, all ran one-by-one");
    }

    #[test]
    fn test_hybrid_report_counts_pids() {
        let config = DrillConfig::default();
        let run = StrategyRun {
            strategy: Strategy::Hybrid,
            results: vec![result(1, Some(10)), result(2, Some(10)), result(3, Some(11))],
            elapsed: Duration::from_secs(4),
        };

        let report = render_report(&run, &config);
        assert!(report.contains("Square of 3 = 9 (PID: 11)"));
        assert!(report.contains("3 processes x 3 threads = 9 parallel workers"));
        assert!(report.contains("Notice 2 different PIDs"));
    }
}
