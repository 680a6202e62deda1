//! Persisted report model.
//!
//! The wire shape is the camelCase JSON document the dashboard page fetches
//! (`generated`/`projectName`/`repository`/`stats`/`branches`/`latestRun`).
//! Counters are monotonic over a branch's lifetime; the run window is not —
//! it keeps the newest [`MAX_RUNS_PER_BRANCH`] entries and evicts the rest.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Runs kept per branch; older entries are evicted, not archived.
pub const MAX_RUNS_PER_BRANCH: usize = 10;

/// Newest runs per branch fed into the global trend series.
pub const TREND_RUNS_PER_BRANCH: usize = 30;

/// Coverage percentage every metric is measured against.
pub const COVERAGE_TARGET_PCT: f64 = 80.0;

/// Branches surfaced in the deployment overview.
pub const CRITICAL_BRANCHES: &[&str] = &["main", "release-v1.0"];

/// Length of the abbreviated commit SHA shown in headers.
pub const SHORT_COMMIT_LEN: usize = 7;

/// Outcome of one CI execution.
///
/// Unrecognized wire values decode as `Unknown` so a report written by a
/// newer pipeline still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Map a free-form status string (e.g. a CI variable) without failing.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!(
                "unknown run status `{other}` (expected success, failed or unknown)"
            )),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        })
    }
}

/// Coverage percentages reported by the test job, stored unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageSnapshot {
    pub lines: f64,
    pub functions: f64,
    pub branches: f64,
    pub statements: f64,
}

/// One CI execution's outcome and metrics.
///
/// `actor`/`commit`/`shortCommit`/`workflowUrl` are enrichment recorded at
/// ingestion time; entries predating that enrichment simply lack them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub run_number: String,
    pub status: RunStatus,
    pub timestamp: DateTime<Utc>,
    /// Wall-clock seconds of the test job, when the pipeline exported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Non-null iff `status == Failed`.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_url: Option<String>,
}

/// Per-branch rollup counters plus the bounded recent-run window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    pub total_runs: u64,
    pub successful_runs: u64,
    /// Newest first, at most [`MAX_RUNS_PER_BRANCH`] entries.
    pub runs: Vec<Run>,
    /// Documentation tree some pipelines attach; opaque here, round-tripped
    /// untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_structure: Option<serde_json::Value>,
}

impl BranchRecord {
    /// The branch's latest run, derived from the window. A branch with no
    /// runs has none and is excluded from every view.
    pub fn latest_run(&self) -> Option<&Run> {
        self.runs.first()
    }
}

/// Header summary of the most recent run across all branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestRun {
    pub run_number: String,
    pub branch: String,
    pub commit: String,
    pub short_commit: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub status: RunStatus,
    pub workflow_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSnapshot>,
}

/// Aggregates over every branch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_runs: u64,
    pub total_branches: u64,
    /// Percentage with one-decimal rounding (the global display policy).
    pub success_rate: f64,
}

/// The full persisted dashboard dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated: DateTime<Utc>,
    pub project_name: String,
    pub repository: String,
    pub stats: GlobalStats,
    pub branches: BTreeMap<String, BranchRecord>,
    /// Serialized as an explicit `null` before the first run: the key is
    /// part of the required top-level schema.
    pub latest_run: Option<LatestRun>,
}

impl Report {
    /// Fresh report with zeroed stats and no branches.
    pub fn new(project_name: &str, repository: &str, now: DateTime<Utc>) -> Self {
        Self {
            generated: now,
            project_name: project_name.to_string(),
            repository: repository.to_string(),
            stats: GlobalStats::default(),
            branches: BTreeMap::new(),
            latest_run: None,
        }
    }
}
