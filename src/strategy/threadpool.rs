//! Strategy 2: a bounded pool of threads in this process

use crate::config::DrillConfig;
use crate::parallel::ThreadPool;
use crate::workload::{WorkResult, square_number};
use anyhow::Result;

/// Every thread blocks independently, so with enough threads the whole batch
/// takes about one latency.
pub fn run(config: &DrillConfig) -> Result<Vec<WorkResult>> {
    let latency = config.simulated_latency();
    let pool = ThreadPool::new(config.thread_pool_size);
    pool.map(config.items.clone(), move |n| square_number(n, latency))
}
