//! Run ingestion: append one CI run to its branch and refresh every rollup.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::model::{
    CoverageSnapshot, LatestRun, Report, Run, RunStatus, MAX_RUNS_PER_BRANCH, SHORT_COMMIT_LEN,
};
use crate::rollup::recompute_stats;

/// Error message recorded on failed runs; the CI log carries the detail.
const FAILURE_ERROR: &str = "Test execution failed - check logs for details";

/// Branch the run is filed under when the environment gave us none.
const FALLBACK_BRANCH: &str = "unknown";

/// One CI run's facts, as supplied by the environment collaborator.
///
/// Every identity field is optional: ingestion degrades instead of
/// aborting, so a partially configured pipeline still records its run.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub timestamp: DateTime<Utc>,
    pub run_number: Option<String>,
    pub branch: Option<String>,
    pub status: Option<RunStatus>,
    pub duration: Option<u64>,
    pub coverage: Option<CoverageSnapshot>,
    pub commit: Option<String>,
    pub actor: Option<String>,
    pub workflow_url: Option<String>,
}

impl IngestRequest {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            run_number: None,
            branch: None,
            status: None,
            duration: None,
            coverage: None,
            commit: None,
            actor: None,
            workflow_url: None,
        }
    }
}

/// `{server}/{repoSlug}/actions/runs/{runId}`.
pub fn workflow_url(server: &str, repo_slug: &str, run_id: &str) -> String {
    format!("{server}/{repo_slug}/actions/runs/{run_id}")
}

/// Record one run: prepend it to its branch's window, bump the counters,
/// trim the window, recompute the global stats and replace the header
/// summary. Pure in-memory mutation; the caller persists the result.
pub fn ingest(report: &mut Report, req: IngestRequest) {
    let status = req.status.unwrap_or_else(|| {
        warn!("run status unavailable, recording run as unknown");
        RunStatus::Unknown
    });
    let branch_name = match req.branch {
        Some(name) if !name.is_empty() => name,
        _ => {
            warn!("branch name unavailable, filing run under `{FALLBACK_BRANCH}`");
            FALLBACK_BRANCH.to_string()
        }
    };
    let run_number = req.run_number.unwrap_or_default();
    let short_commit = req
        .commit
        .as_deref()
        .map(|sha| sha.chars().take(SHORT_COMMIT_LEN).collect::<String>());
    let error = (status == RunStatus::Failed).then(|| FAILURE_ERROR.to_string());

    let run = Run {
        run_number: run_number.clone(),
        status,
        timestamp: req.timestamp,
        duration: req.duration,
        error,
        coverage: req.coverage,
        actor: req.actor.clone(),
        commit: req.commit.clone(),
        short_commit: short_commit.clone(),
        workflow_url: req.workflow_url.clone(),
    };

    let branch = report.branches.entry(branch_name.clone()).or_default();
    branch.runs.insert(0, run);
    branch.total_runs += 1;
    if status == RunStatus::Success {
        branch.successful_runs += 1;
    }
    branch.runs.truncate(MAX_RUNS_PER_BRANCH);

    recompute_stats(report);

    report.latest_run = Some(LatestRun {
        run_number,
        branch: branch_name,
        commit: req.commit.unwrap_or_default(),
        short_commit: short_commit.unwrap_or_default(),
        actor: req.actor.unwrap_or_default(),
        timestamp: req.timestamp,
        status,
        workflow_url: req.workflow_url.unwrap_or_default(),
        coverage: req.coverage,
    });
    report.generated = req.timestamp;
}
