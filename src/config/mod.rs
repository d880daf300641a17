//! Configuration management for multidrill
//!
//! Every strategy receives a [`DrillConfig`] explicitly; nothing is read from
//! global state. Values are layered with figment (see [`DrillConfig::load`]).

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod core;
mod overrides;

pub use self::core::{CONFIG_BASENAME, ENV_PREFIX};
pub use overrides::ConfigOverrides;

/// Inputs and sizing shared by every strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillConfig {
    /// Work items, processed in this order
    pub items: Vec<u64>,

    /// Simulated I/O wait per item (milliseconds)
    pub simulated_latency_ms: u64,

    /// Threads in the thread-pool strategy
    pub thread_pool_size: usize,

    /// Worker processes in the process-pool strategy
    pub process_pool_size: usize,

    /// Worker processes (and chunks) in the hybrid strategy
    pub chunk_process_count: usize,

    /// Threads inside each hybrid worker process
    pub chunk_thread_pool_size: usize,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            items: (1..=14).collect(),
            simulated_latency_ms: 2000,
            thread_pool_size: 14,
            process_pool_size: 3,
            chunk_process_count: 3,
            chunk_thread_pool_size: 3,
        }
    }
}

impl DrillConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.thread_pool_size == 0 {
            bail!("thread_pool_size must be at least 1");
        }
        if self.process_pool_size == 0 {
            bail!("process_pool_size must be at least 1");
        }
        if self.chunk_process_count == 0 {
            bail!("chunk_process_count must be at least 1");
        }
        if self.chunk_thread_pool_size == 0 {
            bail!("chunk_thread_pool_size must be at least 1");
        }

        let cores = num_cpus::get();
        let busiest = self.process_pool_size.max(self.chunk_process_count);
        if busiest > cores {
            tracing::warn!(
                "{} worker processes requested on {} CPU cores; timings still hold for sleep-bound work",
                busiest,
                cores
            );
        }

        Ok(())
    }
}
