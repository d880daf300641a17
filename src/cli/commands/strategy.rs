//! Run a single strategy and print its report

use crate::config::DrillConfig;
use crate::parallel::WorkerProgram;
use crate::strategy::{Strategy, render_header, render_summary};
use anyhow::{Context, Result};

/// Execute one strategy runner
///
/// Result lines go to stdout as the strategy hands them over, between the
/// header and the timing summary.
pub async fn execute(strategy: Strategy, config: DrillConfig) -> Result<()> {
    let worker = WorkerProgram::current_exe()?;

    print!("{}", render_header(strategy, &config));

    let run = tokio::task::spawn_blocking({
        let config = config.clone();
        move || strategy.run_streaming(&config, &worker, |result| println!("{result}"))
    })
    .await
    .context("Strategy task was cancelled or panicked")??;

    print!("{}", render_summary(&run, &config));
    Ok(())
}
