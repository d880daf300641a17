//! Strategy 4: worker processes that each run a thread pool over one chunk

use crate::config::DrillConfig;
use crate::parallel::{ProcessPool, Task, WorkerProgram, partition};
use crate::workload::WorkResult;
use anyhow::Result;

/// Results are flattened chunk by chunk, each chunk in its own order, and
/// carry the pid of the worker process that produced them.
pub fn run(config: &DrillConfig, worker: &WorkerProgram) -> Result<Vec<WorkResult>> {
    let chunks = partition(&config.items, config.chunk_process_count);
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    tracing::debug!(
        "Hybrid chunks: {:?}",
        chunks.iter().map(Vec::len).collect::<Vec<_>>()
    );

    let mut pool = ProcessPool::spawn(config.chunk_process_count, worker)?;
    let tasks = chunks
        .into_iter()
        .map(|chunk| {
            Task::chunk(
                chunk,
                config.chunk_thread_pool_size,
                config.simulated_latency_ms,
            )
        })
        .collect();

    let batches = pool.map(tasks);
    let shutdown = pool.shutdown();
    let batches = batches?;
    shutdown?;

    Ok(batches.into_iter().flatten().collect())
}
