//! # multidrill - four ways to run an I/O-bound batch
//!
//! A small, fixed benchmark that squares a list of numbers, each behind a
//! simulated I/O wait, using four concurrency models:
//!
//! - **Sequential**: one item at a time
//! - **Thread pool**: a bounded pool of threads in one process
//! - **Process pool**: a bounded pool of single-threaded worker processes
//! - **Hybrid**: worker processes that each run a thread pool over one chunk
//!
//! and a harness that launches each of them as an isolated subprocess, times
//! it, and prints a speedup table against the sequential baseline.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run all four and compare (about 45 seconds with defaults)
//! multidrill
//!
//! # Run a single approach, faster
//! multidrill threadpool --latency-ms 200
//!
//! # Inspect the effective configuration
//! multidrill config show
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use multidrill::config::DrillConfig;
//! use multidrill::parallel::WorkerProgram;
//! use multidrill::strategy::Strategy;
//!
//! let config = DrillConfig::default();
//! let worker = WorkerProgram::current_exe()?;
//! let run = Strategy::ThreadPool.run(&config, &worker)?;
//! println!("{} items in {:.2?}", run.results.len(), run.elapsed);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod harness;
pub mod parallel;
pub mod strategy;
pub mod workload;

pub use cli::{Cli, Output};
pub use config::DrillConfig;

/// Result type alias for multidrill operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
