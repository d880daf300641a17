//! Run all four strategies in isolation and print the comparison

use crate::cli::Output;
use crate::config::DrillConfig;
use crate::harness::{Harness, ProcessLauncher, TimingRecord, fastest, render_table};
use crate::harness::table::TABLE_WIDTH;
use crate::strategy::Strategy;
use anyhow::Result;

/// Execute the comparison harness
///
/// `forwarded` global flags are passed to every runner so they all load the
/// same configuration. A failing runner is reported but never aborts the run.
pub async fn execute(config: &DrillConfig, forwarded: Vec<String>, output: &Output) -> Result<()> {
    let latency = config.simulated_latency().as_secs_f64();
    let count = config.items.len();

    output.banner(
        &[
            "MULTITHREADING & MULTIPROCESSING DRILL".to_string(),
            format!("Task: Compute square of {count} numbers, each with {latency:.2} sec I/O wait"),
            format!(
                "Sequential expected: {} x {:.2} = {:.2} seconds",
                count,
                latency,
                Strategy::Sequential.expected_duration(config).as_secs_f64()
            ),
        ],
        TABLE_WIDTH,
    );

    let plan: Vec<(Strategy, String)> = Strategy::ALL
        .iter()
        .map(|strategy| (*strategy, strategy.label(config)))
        .collect();

    let harness = Harness::new(ProcessLauncher::current_exe(forwarded)?);
    let comparison = harness
        .run(&plan, |label| output.step(&format!("Running: {label}")))
        .await;

    for outcome in &comparison.outcomes {
        output.section_header(&format!(">> {}", outcome.label), TABLE_WIDTH);
        if !outcome.run.stdout.is_empty() {
            output.raw(&outcome.run.stdout);
        }
        match outcome.run.failure_reason() {
            Some(reason) => output.error(&format!("Error: {reason}")),
            None if !outcome.run.stderr.trim().is_empty() => output.dimmed(&outcome.run.stderr),
            None => {}
        }
    }

    let timings = comparison.timings();
    output.blank_line();
    output.banner(&["FINAL COMPARISON".to_string()], TABLE_WIDTH);
    // The table is the point of the command, so it prints even with --quiet
    print!("{}", render_table(&timings));
    print_verdict(&timings, output);

    let failures = comparison.failures();
    if failures > 0 {
        output.warning(&format!(
            "{} of {} strategies failed; their rows are marked (failed)",
            failures,
            timings.len()
        ));
    }

    Ok(())
}

fn print_verdict(timings: &[TimingRecord], output: &Output) {
    output.info("[TIP] Higher speedup = faster relative to sequential");
    if let Some(best) = fastest(timings) {
        output.success(&format!(
            "[WIN] For this I/O-bound workload, {} is the winner!",
            best.label
        ));
    }
}
