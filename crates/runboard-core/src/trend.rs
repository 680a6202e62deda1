//! Chart series derivation: stateless transforms from the report to
//! plottable points. All of them are total — missing substructure yields an
//! empty series or a placeholder row, never an error.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{
    BranchRecord, Report, RunStatus, COVERAGE_TARGET_PCT, CRITICAL_BRANCHES,
    TREND_RUNS_PER_BRANCH,
};

/// One sample of the global success/fail trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub x: f64,
    /// 100 for success, 0 otherwise; never interpolated.
    pub y: f64,
    pub timestamp: DateTime<Utc>,
    pub run_number: String,
    pub branch: String,
}

/// One sample of a per-branch sparkline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SparkPoint {
    pub x: f64,
    pub y: f64,
}

/// One coverage-vs-target bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageBar {
    pub label: &'static str,
    pub current: f64,
    pub target: f64,
}

/// Deployment state of one critical branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    pub branch: String,
    pub status: RunStatus,
    pub timestamp: Option<DateTime<Utc>>,
    pub actor: Option<String>,
    pub short_commit: Option<String>,
    pub workflow_url: Option<String>,
}

fn trend_y(status: RunStatus) -> f64 {
    if status == RunStatus::Success {
        100.0
    } else {
        0.0
    }
}

/// Global trend: up to the newest [`TREND_RUNS_PER_BRANCH`] runs of every
/// branch, merged and sorted oldest to newest. X positions are assigned
/// after the sort as the sequence index scaled to `width`; a single point
/// sits at x = 0. An empty report yields an empty series.
pub fn global_trend(report: &Report, width: f64) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = Vec::new();
    for (name, branch) in &report.branches {
        for run in branch.runs.iter().take(TREND_RUNS_PER_BRANCH) {
            points.push(TrendPoint {
                x: 0.0,
                y: trend_y(run.status),
                timestamp: run.timestamp,
                run_number: run.run_number.clone(),
                branch: name.clone(),
            });
        }
    }

    points.sort_by_key(|p| p.timestamp);

    let span = points.len().saturating_sub(1).max(1) as f64;
    for (i, point) in points.iter_mut().enumerate() {
        point.x = i as f64 / span * width;
    }
    points
}

/// Per-branch sparkline over the stored window, oldest first. Success sits
/// at y = 20, anything else at y = 40 (inverted, compressed scale). Fewer
/// than two runs yield no points: a one-sample line is not drawable and the
/// caller renders its "no trend data" placeholder instead.
pub fn branch_sparkline(branch: &BranchRecord, width: f64) -> Vec<SparkPoint> {
    if branch.runs.len() < 2 {
        return Vec::new();
    }
    let span = (branch.runs.len() - 1) as f64;
    branch
        .runs
        .iter()
        .rev()
        .enumerate()
        .map(|(i, run)| SparkPoint {
            x: i as f64 / span * width,
            y: if run.status == RunStatus::Success {
                20.0
            } else {
                40.0
            },
        })
        .collect()
}

/// Coverage-vs-target bars for the latest run's snapshot, values unrounded.
/// Single-snapshot comparison only; no aggregation across runs.
pub fn coverage_bars(report: &Report) -> Vec<CoverageBar> {
    let Some(cov) = report.latest_run.as_ref().and_then(|r| r.coverage.as_ref()) else {
        return Vec::new();
    };
    [
        ("Lines", cov.lines),
        ("Functions", cov.functions),
        ("Branches", cov.branches),
        ("Statements", cov.statements),
    ]
    .into_iter()
    .map(|(label, current)| CoverageBar {
        label,
        current,
        target: COVERAGE_TARGET_PCT,
    })
    .collect()
}

/// One row per critical branch; a branch that is absent or has no runs
/// shows up as unknown with empty metadata rather than being dropped.
pub fn deployment_overview(report: &Report) -> Vec<DeploymentStatus> {
    CRITICAL_BRANCHES
        .iter()
        .map(|&name| match report.branches.get(name).and_then(BranchRecord::latest_run) {
            Some(run) => DeploymentStatus {
                branch: name.to_string(),
                status: run.status,
                timestamp: Some(run.timestamp),
                actor: run.actor.clone(),
                short_commit: run.short_commit.clone(),
                workflow_url: run.workflow_url.clone(),
            },
            None => DeploymentStatus {
                branch: name.to_string(),
                status: RunStatus::Unknown,
                timestamp: None,
                actor: None,
                short_commit: None,
                workflow_url: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ingest, IngestRequest};
    use crate::model::{CoverageSnapshot, Run};
    use chrono::{Duration, Utc};

    fn run_at(n: u32, status: RunStatus, offset_mins: i64) -> Run {
        Run {
            run_number: n.to_string(),
            status,
            timestamp: Utc::now() + Duration::minutes(offset_mins),
            duration: None,
            error: None,
            coverage: None,
            actor: None,
            commit: None,
            short_commit: None,
            workflow_url: None,
        }
    }

    #[test]
    fn empty_report_yields_empty_trend() {
        let report = Report::new("p", "r", Utc::now());
        assert!(global_trend(&report, 800.0).is_empty());

        let mut with_empty_branch = report;
        with_empty_branch
            .branches
            .insert("main".into(), BranchRecord::default());
        assert!(global_trend(&with_empty_branch, 800.0).is_empty());
    }

    #[test]
    fn trend_is_sorted_by_timestamp_across_branches() {
        let mut report = Report::new("p", "r", Utc::now());
        report.branches.insert(
            "a".into(),
            BranchRecord {
                total_runs: 2,
                successful_runs: 2,
                // Newest first in storage.
                runs: vec![
                    run_at(4, RunStatus::Success, 40),
                    run_at(1, RunStatus::Success, 10),
                ],
                folder_structure: None,
            },
        );
        report.branches.insert(
            "b".into(),
            BranchRecord {
                total_runs: 2,
                successful_runs: 1,
                runs: vec![
                    run_at(3, RunStatus::Failed, 30),
                    run_at(2, RunStatus::Success, 20),
                ],
                folder_structure: None,
            },
        );

        let points = global_trend(&report, 300.0);
        let order: Vec<&str> = points.iter().map(|p| p.run_number.as_str()).collect();
        assert_eq!(order, ["1", "2", "3", "4"]);

        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[3].x, 300.0);
        assert_eq!(points[2].y, 0.0);
        assert_eq!(points[3].y, 100.0);
    }

    #[test]
    fn single_trend_point_sits_at_origin() {
        let mut report = Report::new("p", "r", Utc::now());
        let mut req = IngestRequest::new(Utc::now());
        req.branch = Some("main".into());
        req.status = Some(RunStatus::Success);
        ingest(&mut report, req);

        let points = global_trend(&report, 800.0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[0].y, 100.0);
    }

    #[test]
    fn sparkline_needs_two_runs() {
        let mut branch = BranchRecord {
            total_runs: 1,
            successful_runs: 1,
            runs: vec![run_at(1, RunStatus::Success, 0)],
            folder_structure: None,
        };
        assert!(branch_sparkline(&branch, 300.0).is_empty());

        branch.runs.insert(0, run_at(2, RunStatus::Failed, 10));
        branch.total_runs = 2;
        let points = branch_sparkline(&branch, 300.0);
        assert_eq!(points.len(), 2);
        // Oldest first: the success at x=0, the newer failure at x=width.
        assert_eq!(points[0], SparkPoint { x: 0.0, y: 20.0 });
        assert_eq!(points[1], SparkPoint { x: 300.0, y: 40.0 });
    }

    #[test]
    fn coverage_bars_pass_values_through_unrounded() {
        let mut report = Report::new("p", "r", Utc::now());
        assert!(coverage_bars(&report).is_empty());

        let mut req = IngestRequest::new(Utc::now());
        req.branch = Some("main".into());
        req.status = Some(RunStatus::Success);
        req.coverage = Some(CoverageSnapshot {
            lines: 7.28,
            functions: 8.7,
            branches: 6.0,
            statements: 7.46,
        });
        ingest(&mut report, req);

        let bars = coverage_bars(&report);
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].label, "Lines");
        assert_eq!(bars[0].current, 7.28);
        assert_eq!(bars[1].current, 8.7);
        assert_eq!(bars[2].current, 6.0);
        assert_eq!(bars[3].current, 7.46);
        assert!(bars.iter().all(|b| b.target == COVERAGE_TARGET_PCT));
    }

    #[test]
    fn deployment_overview_fills_placeholders_for_absent_branches() {
        let mut report = Report::new("p", "r", Utc::now());
        let mut req = IngestRequest::new(Utc::now());
        req.branch = Some("main".into());
        req.status = Some(RunStatus::Success);
        req.actor = Some("brukGit".into());
        ingest(&mut report, req);

        let rows = deployment_overview(&report);
        assert_eq!(rows.len(), CRITICAL_BRANCHES.len());
        assert_eq!(rows[0].branch, "main");
        assert_eq!(rows[0].status, RunStatus::Success);
        assert_eq!(rows[0].actor.as_deref(), Some("brukGit"));
        assert_eq!(rows[1].branch, "release-v1.0");
        assert_eq!(rows[1].status, RunStatus::Unknown);
        assert!(rows[1].timestamp.is_none());
    }
}
