//! The simulated I/O-bound unit of work every strategy parallelizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome of one workload call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkResult {
    pub item: u64,
    /// Wide enough that any `u64` item squares without overflow
    pub square: u128,
    /// Process that produced the result, recorded only by the hybrid strategy
    #[serde(default)]
    pub pid: Option<u32>,
}

impl fmt::Display for WorkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square of {} = {}", self.item, self.square)?;
        if let Some(pid) = self.pid {
            write!(f, " (PID: {pid})")?;
        }
        Ok(())
    }
}

/// Block for `latency` (standing in for an external call), then square `n`.
pub fn square_number(n: u64, latency: Duration) -> WorkResult {
    std::thread::sleep(latency);
    WorkResult {
        item: n,
        square: u128::from(n) * u128::from(n),
        pid: None,
    }
}

/// Same as [`square_number`], tagged with the current process id.
pub fn square_number_tagged(n: u64, latency: Duration) -> WorkResult {
    WorkResult {
        pid: Some(std::process::id()),
        ..square_number(n, latency)
    }
}
