//! `runboard chart` — emit the derived chart series as JSON for the page
//! renderer. The painting itself (SVG/Canvas) happens client-side; this
//! command is the contract between the core and that collaborator.

use std::collections::BTreeMap;

use anyhow::Context;
use serde_json::json;

use crate::cli::args::ChartArgs;
use crate::exit_codes;
use runboard_core::store;
use runboard_core::trend::{branch_sparkline, coverage_bars, deployment_overview, global_trend, SparkPoint};

pub async fn run(args: ChartArgs) -> anyhow::Result<i32> {
    let report = match store::load(&args.report) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let sparklines: BTreeMap<&str, Vec<SparkPoint>> = report
        .branches
        .iter()
        .map(|(name, branch)| (name.as_str(), branch_sparkline(branch, args.spark_width)))
        .collect();

    let payload = json!({
        "generated": report.generated,
        "trend": global_trend(&report, args.width),
        "sparklines": sparklines,
        "coverage": coverage_bars(&report),
        "deployments": deployment_overview(&report),
    });
    let rendered = serde_json::to_string_pretty(&payload)?;

    match &args.out {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("failed to write chart series to {}", path.display()))?;
            eprintln!("Wrote chart series to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(exit_codes::OK)
}
