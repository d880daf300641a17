//! Comparison harness
//!
//! Launches every strategy as an isolated run, one after another, and turns
//! the captured runs into [`TimingRecord`]s. Isolation keeps one strategy's
//! threads and processes from skewing another's timing, and makes the
//! measured time include process startup and pool teardown.
//!
//! ```text
//! Harness ──launch──▶ multidrill sequential  ──▶ IsolatedRun ─┐
//!         ──launch──▶ multidrill threadpool  ──▶ IsolatedRun ─┤
//!         ──launch──▶ multidrill processpool ──▶ IsolatedRun ─┼──▶ table
//!         ──launch──▶ multidrill hybrid      ──▶ IsolatedRun ─┘
//! ```

use crate::strategy::Strategy;

pub mod launcher;
pub mod table;

pub use launcher::{IsolatedRun, Launcher, ProcessLauncher};
pub use table::{TimingRecord, fastest, render_table, speedup, speedups};

/// What the harness saw for one strategy
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub strategy: Strategy,
    pub label: String,
    pub run: IsolatedRun,
}

impl StrategyOutcome {
    pub fn timing(&self) -> TimingRecord {
        TimingRecord {
            label: self.label.clone(),
            elapsed: self.run.elapsed,
            success: self.run.success,
        }
    }
}

/// Outcomes of a full comparison, in launch order
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    pub outcomes: Vec<StrategyOutcome>,
}

impl Comparison {
    pub fn timings(&self) -> Vec<TimingRecord> {
        self.outcomes.iter().map(StrategyOutcome::timing).collect()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.run.success).count()
    }
}

pub struct Harness<L> {
    launcher: L,
}

impl<L: Launcher> Harness<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Launch each `(strategy, label)` in order, waiting for one to finish
    /// before starting the next.
    ///
    /// `on_start` is called with each label right before its launch.
    pub async fn run<F>(&self, plan: &[(Strategy, String)], mut on_start: F) -> Comparison
    where
        F: FnMut(&str),
    {
        let mut comparison = Comparison::default();

        for (strategy, label) in plan {
            on_start(label);
            let run = self.launcher.launch(*strategy).await;

            if run.success {
                tracing::info!("{} completed in {:.2?}", label, run.elapsed);
            } else {
                tracing::warn!(
                    "{} failed after {:.2?}: {}",
                    label,
                    run.elapsed,
                    run.failure_reason().unwrap_or_default()
                );
            }

            comparison.outcomes.push(StrategyOutcome {
                strategy: *strategy,
                label: label.clone(),
                run,
            });
        }

        comparison
    }
}
