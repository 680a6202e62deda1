//! `runboard summary` — KPI header, deployment rows and the filtered
//! branch table, as text, markdown or JSON.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::args::SummaryArgs;
use crate::exit_codes;
use runboard_core::model::{BranchRecord, Report, RunStatus};
use runboard_core::store;
use runboard_core::trend::deployment_overview;
use runboard_core::view::{select, ViewCriteria};

pub async fn run(args: SummaryArgs) -> anyhow::Result<i32> {
    let report = match store::load(&args.report) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let criteria = match criteria_from_args(&args) {
        Ok(criteria) => criteria,
        Err(msg) => {
            eprintln!("error: {msg}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let rows = select(&report.branches, &criteria);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&rows_json(&report, &rows))?),
        "markdown" => print_markdown(&report, &rows),
        _ => print_text(&report, &rows),
    }
    Ok(exit_codes::OK)
}

fn criteria_from_args(args: &SummaryArgs) -> Result<ViewCriteria, String> {
    if let Some(preset) = args.preset.as_deref() {
        return match preset {
            "failed" => Ok(ViewCriteria::failed()),
            "low-coverage" => Ok(ViewCriteria::low_coverage()),
            "recent" => Ok(ViewCriteria::recent()),
            other => Err(format!(
                "unknown preset `{other}` (expected failed, low-coverage or recent)"
            )),
        };
    }
    Ok(ViewCriteria {
        search: args.search.clone(),
        status: args.status,
        date_from: args.since,
        date_to: args.until,
        sort: args.sort,
    })
}

/// Whole percentages print without a decimal, everything else with one.
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{}", rate as i64)
    } else {
        format!("{rate:.1}")
    }
}

/// Relative time the header shows next to "Last updated".
fn format_relative_time(diff_minutes: i64) -> String {
    if diff_minutes < 1 {
        "Just now".to_string()
    } else if diff_minutes < 60 {
        format!("{diff_minutes} min ago")
    } else if diff_minutes < 1440 {
        format!("{} hours ago", diff_minutes / 60)
    } else {
        format!("{} days ago", diff_minutes / 1440)
    }
}

fn minutes_since(stamp: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - stamp).num_minutes().max(0)
}

/// Trend marker on branch cards, keyed off the rounded branch rate.
fn trend_marker(rate_percent: u32) -> &'static str {
    if rate_percent >= 90 {
        "📈"
    } else if rate_percent >= 70 {
        "📊"
    } else {
        "📉"
    }
}

fn status_badge(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Success => "✅",
        RunStatus::Failed => "❌",
        RunStatus::Unknown => "⚠️",
    }
}

fn print_text(report: &Report, rows: &[(&str, &BranchRecord)]) {
    println!("{} — CI Run Summary", report.project_name);
    println!("========================================");
    println!(
        "Total runs: {}   Branches: {}   Success rate: {}%",
        report.stats.total_runs,
        report.stats.total_branches,
        format_rate(report.stats.success_rate)
    );
    println!(
        "Last updated: {}",
        format_relative_time(minutes_since(report.generated, Utc::now()))
    );

    println!();
    println!("Deployments:");
    for dep in deployment_overview(report) {
        let detail = match dep.timestamp {
            Some(ts) => format!(
                "{} by {}",
                ts.format("%Y-%m-%d %H:%M UTC"),
                dep.actor.as_deref().unwrap_or("N/A")
            ),
            None => "no runs recorded".to_string(),
        };
        println!(
            "  {} {} — {} ({detail})",
            status_badge(dep.status),
            dep.branch,
            dep.status.to_string().to_uppercase()
        );
    }

    println!();
    if rows.is_empty() {
        println!("No branches match the current filters.");
        return;
    }
    println!("Branches:");
    for (name, branch) in rows {
        let rate = branch.success_rate_percent();
        // Selection guarantees a latest run.
        let latest = branch.latest_run().expect("selected branch has runs");
        println!(
            "  {} {}  {}%  {} runs  latest #{} {} {}",
            trend_marker(rate),
            name,
            rate,
            branch.total_runs,
            latest.run_number,
            status_badge(latest.status),
            latest.timestamp.format("%Y-%m-%d %H:%M UTC")
        );
    }
}

fn print_markdown(report: &Report, rows: &[(&str, &BranchRecord)]) {
    println!("# {} — CI Run Summary", report.project_name);
    println!(
        "**Total runs**: {} · **Branches**: {} · **Success rate**: {}%",
        report.stats.total_runs,
        report.stats.total_branches,
        format_rate(report.stats.success_rate)
    );

    println!();
    println!("## Deployments");
    for dep in deployment_overview(report) {
        println!(
            "- **{}**: {} {}",
            dep.branch,
            status_badge(dep.status),
            dep.status.to_string().to_uppercase()
        );
    }

    println!();
    println!("## Branches");
    if rows.is_empty() {
        println!("_No branches match the current filters._");
        return;
    }
    println!("| Branch | Success rate | Runs | Latest |");
    println!("|---|---|---|---|");
    for (name, branch) in rows {
        let latest = branch.latest_run().expect("selected branch has runs");
        println!(
            "| {} | {}% {} | {} | {} #{} |",
            name,
            branch.success_rate_percent(),
            trend_marker(branch.success_rate_percent()),
            branch.total_runs,
            status_badge(latest.status),
            latest.run_number
        );
    }
}

fn rows_json(report: &Report, rows: &[(&str, &BranchRecord)]) -> serde_json::Value {
    json!({
        "projectName": report.project_name,
        "stats": report.stats,
        "branches": rows
            .iter()
            .map(|(name, branch)| {
                json!({
                    "name": name,
                    "totalRuns": branch.total_runs,
                    "successfulRuns": branch.successful_runs,
                    "successRate": branch.success_rate_percent(),
                    "latestRun": branch.latest_run(),
                })
            })
            .collect::<Vec<_>>(),
    })
}
