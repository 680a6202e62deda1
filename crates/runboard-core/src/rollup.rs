//! Aggregate statistics derived from run lists.
//!
//! Two rounding policies coexist on purpose: branch cards show a
//! nearest-integer rate, the global header keeps one decimal. Call sites
//! must not unify them.

use crate::model::{BranchRecord, CoverageSnapshot, Report, Run};

/// Round to one decimal place (global success-rate policy).
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl CoverageSnapshot {
    /// Unweighted mean of the four metrics.
    pub fn mean(&self) -> f64 {
        (self.lines + self.functions + self.branches + self.statements) / 4.0
    }
}

impl BranchRecord {
    /// Success rate as displayed on branch cards (nearest integer).
    pub fn success_rate_percent(&self) -> u32 {
        if self.total_runs == 0 {
            return 0;
        }
        ((self.successful_runs as f64 / self.total_runs as f64) * 100.0).round() as u32
    }

    /// Raw success fraction in [0, 1]; sort key, never displayed.
    pub fn success_fraction(&self) -> f64 {
        if self.total_runs == 0 {
            return 0.0;
        }
        self.successful_runs as f64 / self.total_runs as f64
    }
}

impl Run {
    /// Mean coverage of this run, 0 when no snapshot was recorded.
    /// Sort key only: display paths must distinguish "0%" from "no data".
    pub fn average_coverage(&self) -> f64 {
        self.coverage.as_ref().map(CoverageSnapshot::mean).unwrap_or(0.0)
    }
}

/// Recompute `report.stats` from the branch rollups.
pub fn recompute_stats(report: &mut Report) {
    let total_runs: u64 = report.branches.values().map(|b| b.total_runs).sum();
    let successful: u64 = report.branches.values().map(|b| b.successful_runs).sum();
    report.stats.total_branches = report.branches.len() as u64;
    report.stats.total_runs = total_runs;
    report.stats.success_rate = if total_runs > 0 {
        round1(successful as f64 / total_runs as f64 * 100.0)
    } else {
        0.0
    };
}
