//! `runboard validate` — schema-gate a report file as a CI step.

use crate::cli::args::ValidateArgs;
use crate::exit_codes;
use runboard_core::store;

pub async fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    match store::load(&args.report) {
        Ok(report) => {
            println!(
                "✓ {} is a valid report ({} branches, {} runs)",
                args.report.display(),
                report.stats.total_branches,
                report.stats.total_runs
            );
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("✗ {}: {err}", args.report.display());
            Ok(exit_codes::CONFIG_ERROR)
        }
    }
}
