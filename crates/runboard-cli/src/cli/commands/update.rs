//! `runboard update` — record the current CI run into the report.
//!
//! Runs after the test job, fed by the workflow environment. Missing
//! identity fields degrade (unknown status, `unknown` branch); only a
//! failed write aborts, and then loudly.

use chrono::Utc;

use crate::cli::args::UpdateArgs;
use crate::exit_codes;
use runboard_core::ingest::{ingest, workflow_url, IngestRequest};
use runboard_core::model::{CoverageSnapshot, RunStatus};
use runboard_core::store;

pub async fn run(args: UpdateArgs) -> anyhow::Result<i32> {
    let now = Utc::now();
    let mut report =
        store::load_or_init(&args.report, &args.project_name, &args.repository_url, now);

    let mut req = IngestRequest::new(now);
    req.run_number = args.run_number.clone();
    req.branch = args.branch.clone();
    req.status = args.status.as_deref().map(RunStatus::parse_lenient);
    req.duration = args.duration;
    req.coverage = coverage_from_args(&args);
    req.commit = args.commit.clone();
    req.actor = args.actor.clone();
    req.workflow_url = match (&args.server_url, &args.repository, &args.run_id) {
        (Some(server), Some(repo), Some(run_id)) => Some(workflow_url(server, repo, run_id)),
        _ => None,
    };

    ingest(&mut report, req);

    if let Err(err) = store::save(&report, &args.report) {
        eprintln!("error: failed to persist report: {err}");
        return Ok(exit_codes::INFRA_ERROR);
    }

    let latest = report.latest_run.as_ref().expect("just ingested");
    println!(
        "Updated {} with run #{} on {} ({})",
        args.report.display(),
        latest.run_number,
        latest.branch,
        latest.status
    );
    Ok(exit_codes::OK)
}

/// A snapshot exists only when the test job exported at least one metric;
/// a metric the job skipped individually still defaults to 0.
fn coverage_from_args(args: &UpdateArgs) -> Option<CoverageSnapshot> {
    if args.coverage_lines.is_none()
        && args.coverage_functions.is_none()
        && args.coverage_branches.is_none()
        && args.coverage_statements.is_none()
    {
        return None;
    }
    Some(CoverageSnapshot {
        lines: args.coverage_lines.unwrap_or(0.0),
        functions: args.coverage_functions.unwrap_or(0.0),
        branches: args.coverage_branches.unwrap_or(0.0),
        statements: args.coverage_statements.unwrap_or(0.0),
    })
}
