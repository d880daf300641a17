//! Timing records and the final comparison table

use std::fmt::Write;
use std::time::Duration;

/// Width of the comparison table's rules
pub const TABLE_WIDTH: usize = 60;

/// One row of the comparison: how long a strategy took end to end
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub label: String,
    pub elapsed: Duration,
    pub success: bool,
}

/// `baseline / elapsed`, or 0 when `elapsed` is zero
pub fn speedup(baseline: Duration, elapsed: Duration) -> f64 {
    if elapsed.is_zero() {
        return 0.0;
    }
    baseline.as_secs_f64() / elapsed.as_secs_f64()
}

/// Speedup of every record relative to the first one
pub fn speedups(records: &[TimingRecord]) -> Vec<f64> {
    let Some(baseline) = records.first().map(|r| r.elapsed) else {
        return Vec::new();
    };
    records.iter().map(|r| speedup(baseline, r.elapsed)).collect()
}

/// Fastest successful record with a measurable time
pub fn fastest(records: &[TimingRecord]) -> Option<&TimingRecord> {
    records
        .iter()
        .filter(|r| r.success && !r.elapsed.is_zero())
        .min_by_key(|r| r.elapsed)
}

pub fn render_table(records: &[TimingRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<35} {:>10} {:>10}", "Approach", "Time", "Speedup");
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));

    for (record, speedup) in records.iter().zip(speedups(records)) {
        let _ = write!(
            out,
            "{:<35} {:>8.2}s {:>8.1}x",
            record.label,
            record.elapsed.as_secs_f64(),
            speedup
        );
        if !record.success {
            let _ = write!(out, "  (failed)");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    out
}
