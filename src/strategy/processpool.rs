//! Strategy 3: a bounded pool of single-threaded worker processes

use crate::config::DrillConfig;
use crate::parallel::{ProcessPool, Task, WorkerProgram};
use crate::workload::WorkResult;
use anyhow::Result;

/// Each item is its own task, so the pool works through
/// `ceil(items / processes)` rounds of one wait each.
pub fn run(config: &DrillConfig, worker: &WorkerProgram) -> Result<Vec<WorkResult>> {
    if config.items.is_empty() {
        return Ok(Vec::new());
    }

    let mut pool = ProcessPool::spawn(config.process_pool_size, worker)?;
    tracing::debug!("Process pool ready with {} workers", pool.size());

    let tasks = config
        .items
        .iter()
        .map(|&n| Task::single(n, config.simulated_latency_ms))
        .collect();

    let replies = pool.map(tasks);
    let shutdown = pool.shutdown();
    let replies = replies?;
    shutdown?;

    Ok(replies.into_iter().flatten().collect())
}
