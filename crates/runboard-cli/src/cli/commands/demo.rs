//! `runboard demo` — seed a consistent demo report so the dashboard has
//! something to paint before the first CI run lands.

use chrono::{DateTime, Duration, Utc};

use crate::cli::args::DemoArgs;
use crate::exit_codes;
use runboard_core::ingest::{ingest, workflow_url, IngestRequest};
use runboard_core::model::{CoverageSnapshot, Report, RunStatus};
use runboard_core::store;

pub async fn run(args: DemoArgs) -> anyhow::Result<i32> {
    if args.out.exists() && !args.force {
        eprintln!(
            "refusing to overwrite {} (pass --force to replace it)",
            args.out.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let report = demo_report(Utc::now());
    if let Err(err) = store::save(&report, &args.out) {
        eprintln!("error: failed to write demo report: {err}");
        return Ok(exit_codes::INFRA_ERROR);
    }

    println!(
        "✓ Wrote demo report to {} ({} branches, {} runs, {}% success)",
        args.out.display(),
        report.stats.total_branches,
        report.stats.total_runs,
        report.stats.success_rate
    );
    Ok(exit_codes::OK)
}

/// Build the demo dataset through the real ingestion path so every
/// invariant (counters, window bound, stats) holds by construction.
fn demo_report(now: DateTime<Utc>) -> Report {
    let mut report = Report::new(
        "Runboard (Demo)",
        "https://github.com/example/runboard-demo",
        now,
    );

    // develop: flakier.
    for n in 1..=5u32 {
        let status = if n % 2 == 0 {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
        ingest(
            &mut report,
            demo_request(now, "develop", 20 + n, status, i64::from(6 - n) * 240),
        );
    }

    // feature branch with a single run: exercises the no-trend placeholder.
    ingest(
        &mut report,
        demo_request(now, "feature/scanner", 3, RunStatus::Success, 30),
    );

    // main last: a long green streak with one wobble, so the header's
    // latest run is the freshest one and carries the coverage snapshot.
    for n in 1..=12u32 {
        let status = if n == 10 {
            RunStatus::Failed
        } else {
            RunStatus::Success
        };
        let mut req = demo_request(now, "main", 54 + n, status, i64::from(12 - n) * 90);
        if n == 12 {
            req.coverage = Some(CoverageSnapshot {
                lines: 7.28,
                functions: 8.7,
                branches: 6.0,
                statements: 7.46,
            });
        }
        ingest(&mut report, req);
    }

    report
}

fn demo_request(
    now: DateTime<Utc>,
    branch: &str,
    run_number: u32,
    status: RunStatus,
    age_minutes: i64,
) -> IngestRequest {
    let mut req = IngestRequest::new(now - Duration::minutes(age_minutes));
    req.run_number = Some(run_number.to_string());
    req.branch = Some(branch.to_string());
    req.status = Some(status);
    req.duration = Some(20 + u64::from(run_number % 40));
    req.commit = Some(format!("{:040x}", u64::from(run_number) * 0x9e3779b9));
    req.actor = Some("brukGit".to_string());
    req.workflow_url = Some(workflow_url(
        "https://github.com",
        "example/runboard-demo",
        &format!("159534{run_number:05}"),
    ));
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_report_is_internally_consistent() {
        let report = demo_report(Utc::now());

        let total: u64 = report.branches.values().map(|b| b.total_runs).sum();
        assert_eq!(report.stats.total_runs, total);
        assert_eq!(report.stats.total_branches, 3);
        for branch in report.branches.values() {
            assert!(branch.successful_runs <= branch.total_runs);
            assert!(branch.runs.len() <= 10);
        }
        // main saw 12 runs, the window keeps 10.
        assert_eq!(report.branches["main"].total_runs, 12);
        assert_eq!(report.branches["main"].runs.len(), 10);

        // The header summary points at main's freshest run, coverage included.
        let latest = report.latest_run.as_ref().unwrap();
        assert_eq!(latest.branch, "main");
        assert_eq!(latest.run_number, "66");
        assert!(latest.coverage.is_some());
    }

    #[tokio::test]
    async fn demo_round_trips_through_the_store() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("index.json");

        let code = run(DemoArgs {
            out: out.clone(),
            force: false,
        })
        .await?;
        assert_eq!(code, exit_codes::OK);

        let reloaded = store::load(&out)?;
        assert_eq!(reloaded.project_name, "Runboard (Demo)");

        // A second write without --force is refused.
        let code = run(DemoArgs { out, force: false }).await?;
        assert_eq!(code, exit_codes::CONFIG_ERROR);
        Ok(())
    }
}
