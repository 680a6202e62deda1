//! Report persistence: one JSON document, loaded at process start and
//! written back after ingestion.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::error::ReportError;
use crate::model::Report;

/// Top-level keys a payload must carry to be treated as a report.
pub const REQUIRED_FIELDS: [&str; 5] = ["generated", "projectName", "latestRun", "stats", "branches"];

/// Load and schema-gate the persisted report.
///
/// The gate runs once here: a payload that parses but lacks a required key
/// is rejected exactly like a transport failure, and derivations downstream
/// never see partial data.
pub fn load(path: &Path) -> Result<Report, ReportError> {
    let raw = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw)?;
    for field in REQUIRED_FIELDS {
        if value.get(field).is_none() {
            return Err(ReportError::MissingField { field });
        }
    }
    serde_json::from_value(value).map_err(ReportError::Decode)
}

/// Ingestion-side loader: any load failure starts a fresh report instead of
/// aborting the CI write.
pub fn load_or_init(
    path: &Path,
    project_name: &str,
    repository: &str,
    now: DateTime<Utc>,
) -> Report {
    match load(path) {
        Ok(report) => report,
        Err(err) => {
            info!("starting a fresh report at {}: {err}", path.display());
            Report::new(project_name, repository, now)
        }
    }
}

/// Persist the report with 2-space indentation.
///
/// Plain read-modify-write with no lock: two CI jobs updating the same
/// report concurrently can lose one update. Serialize jobs touching the
/// same report at the pipeline level, or move to atomic-append storage.
pub fn save(report: &Report, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}
