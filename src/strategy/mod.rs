//! The four concurrency strategies being compared
//!
//! Every strategy applies the same workload to the same configured items and
//! hands back a [`StrategyRun`]. Apart from the hybrid strategy, results are
//! in input order; hybrid results are grouped chunk by chunk.

use crate::config::DrillConfig;
use crate::parallel::{WorkerProgram, chunk_size};
use crate::workload::WorkResult;
use anyhow::Result;
use std::time::{Duration, Instant};

pub mod hybrid;
pub mod processpool;
pub mod report;
pub mod sequential;
pub mod threadpool;

pub use report::{render_header, render_report, render_summary};

/// One concurrency model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Sequential,
    ThreadPool,
    ProcessPool,
    Hybrid,
}

/// Results and wall-clock time of one strategy run
#[derive(Debug, Clone)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub results: Vec<WorkResult>,
    pub elapsed: Duration,
}

impl Strategy {
    /// Comparison order; the first entry is the speedup baseline
    pub const ALL: [Strategy; 4] = [
        Strategy::Sequential,
        Strategy::ThreadPool,
        Strategy::ProcessPool,
        Strategy::Hybrid,
    ];

    /// CLI subcommand that runs this strategy
    pub fn subcommand(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::ThreadPool => "threadpool",
            Strategy::ProcessPool => "processpool",
            Strategy::Hybrid => "hybrid",
        }
    }

    pub fn number(self) -> usize {
        match self {
            Strategy::Sequential => 1,
            Strategy::ThreadPool => 2,
            Strategy::ProcessPool => 3,
            Strategy::Hybrid => 4,
        }
    }

    pub fn label(self, config: &DrillConfig) -> String {
        match self {
            Strategy::Sequential => "Sequential (No Parallelism)".to_string(),
            Strategy::ThreadPool => format!("ThreadPool ({} threads)", config.thread_pool_size),
            Strategy::ProcessPool => {
                format!("ProcessPool ({} processes)", config.process_pool_size)
            }
            Strategy::Hybrid => format!(
                "Hybrid ({} proc x {} threads)",
                config.chunk_process_count, config.chunk_thread_pool_size
            ),
        }
    }

    /// How many back-to-back waits the slowest worker goes through
    pub fn expected_rounds(self, config: &DrillConfig) -> usize {
        let len = config.items.len();
        if len == 0 {
            return 0;
        }
        match self {
            Strategy::Sequential => len,
            Strategy::ThreadPool => len.div_ceil(config.thread_pool_size.max(1)),
            Strategy::ProcessPool => len.div_ceil(config.process_pool_size.max(1)),
            Strategy::Hybrid => {
                let chunk = chunk_size(len, config.chunk_process_count);
                chunk.div_ceil(config.chunk_thread_pool_size.clamp(1, chunk))
            }
        }
    }

    /// Ideal duration, ignoring spawn and scheduling overhead
    pub fn expected_duration(self, config: &DrillConfig) -> Duration {
        config.simulated_latency() * self.expected_rounds(config) as u32
    }

    /// Run this strategy in the current process and time it.
    ///
    /// `worker` is only used by the process-based strategies.
    pub fn run(self, config: &DrillConfig, worker: &WorkerProgram) -> Result<StrategyRun> {
        self.run_streaming(config, worker, |_| {})
    }

    /// Like [`Strategy::run`], handing each result to `on_result` in output
    /// order. The sequential strategy does so as each item finishes; the
    /// pooled strategies once their pool has returned.
    pub fn run_streaming<F>(
        self,
        config: &DrillConfig,
        worker: &WorkerProgram,
        mut on_result: F,
    ) -> Result<StrategyRun>
    where
        F: FnMut(&WorkResult),
    {
        tracing::info!(
            "Running {} over {} items",
            self.label(config),
            config.items.len()
        );

        let start = Instant::now();
        let results = match self {
            Strategy::Sequential => sequential::run(config, &mut on_result),
            Strategy::ThreadPool => replay(threadpool::run(config)?, &mut on_result),
            Strategy::ProcessPool => replay(processpool::run(config, worker)?, &mut on_result),
            Strategy::Hybrid => replay(hybrid::run(config, worker)?, &mut on_result),
        };
        let elapsed = start.elapsed();

        tracing::info!("{} finished in {:.2?}", self.label(config), elapsed);

        Ok(StrategyRun {
            strategy: self,
            results,
            elapsed,
        })
    }
}

fn replay<F>(results: Vec<WorkResult>, on_result: &mut F) -> Vec<WorkResult>
where
    F: FnMut(&WorkResult),
{
    results.iter().for_each(&mut *on_result);
    results
}
