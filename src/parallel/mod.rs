//! Execution building blocks shared by the strategies
//!
//! This module owns the **how** of running work concurrently and knows nothing
//! about which strategy is being measured:
//!
//! - [`ThreadPool`]: bounded worker threads fed through crossbeam channels,
//!   results returned in submission order
//! - [`ProcessPool`]: bounded worker processes, one task in flight per process,
//!   replies returned in submission order
//! - [`partition`]: deterministic ceiling-division chunking for handing one
//!   contiguous chunk to each worker process
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Strategy      │    │   Parallel       │    │   OS            │
//! │   runners       │───▶│   module         │───▶│   threads and   │
//! │                 │    │                  │    │   processes     │
//! │ • which items   │    │ • pool sizing    │    │                 │
//! │ • which pools   │    │ • dispatch       │    │                 │
//! │ • result shape  │    │ • ordering       │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use multidrill::parallel::{ThreadPool, partition};
//!
//! let chunks = partition(&[1, 2, 3, 4, 5], 2);
//! assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5]]);
//!
//! let pool = ThreadPool::new(4);
//! let doubled = pool.map(vec![1, 2, 3], |x| x * 2).unwrap();
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

pub mod core;
pub mod partition;
pub mod process;

pub use self::core::ThreadPool;
pub use partition::{chunk_size, partition};
pub use process::{ProcessPool, Task, WorkerProgram};
