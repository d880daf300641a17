//! Strategy 1: one item at a time on the calling thread

use crate::config::DrillConfig;
use crate::workload::{WorkResult, square_number};

/// Baseline: total time is roughly `items × latency`
///
/// `on_result` sees each result as soon as its wait is over.
pub fn run<F>(config: &DrillConfig, mut on_result: F) -> Vec<WorkResult>
where
    F: FnMut(&WorkResult),
{
    let latency = config.simulated_latency();
    config
        .items
        .iter()
        .map(|&n| {
            let result = square_number(n, latency);
            tracing::debug!("{}", result);
            on_result(&result);
            result
        })
        .collect()
}
