use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use runboard_core::model::RunStatus;
use runboard_core::view::SortKey;

#[derive(Parser)]
#[command(
    name = "runboard",
    version,
    about = "CI run-history dashboard — accumulate test runs into one JSON report and derive its view-models"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Record the current CI run into the report (runs after the test job)
    Update(UpdateArgs),
    /// Print the KPI header, deployments and the filtered branch table
    Summary(SummaryArgs),
    /// Emit the chart series (trend, sparklines, coverage bars) as JSON
    Chart(ChartArgs),
    /// Check a report file against the required schema
    Validate(ValidateArgs),
    /// Write a demo report so the dashboard has data before the first run
    Demo(DemoArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Report file, updated in place
    #[arg(long, default_value = "index.json")]
    pub report: PathBuf,

    /// Project name recorded when creating a fresh report
    #[arg(long, default_value = "Runboard Project")]
    pub project_name: String,

    /// Repository URL recorded when creating a fresh report
    #[arg(long, default_value = "")]
    pub repository_url: String,

    #[arg(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: Option<String>,

    #[arg(long, env = "GITHUB_REF_NAME")]
    pub branch: Option<String>,

    /// Outcome of the test job; anything but success/failed records unknown
    #[arg(long, env = "TEST_STATUS")]
    pub status: Option<String>,

    #[arg(long, env = "GITHUB_SHA")]
    pub commit: Option<String>,

    #[arg(long, env = "GITHUB_ACTOR")]
    pub actor: Option<String>,

    /// Test job duration in seconds, when the pipeline measured it
    #[arg(long, env = "TEST_DURATION")]
    pub duration: Option<u64>,

    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    #[arg(long, env = "GITHUB_SERVER_URL")]
    pub server_url: Option<String>,

    /// owner/repo slug used to build the workflow URL
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    #[arg(long, env = "COVERAGE_LINES")]
    pub coverage_lines: Option<f64>,

    #[arg(long, env = "COVERAGE_FUNCTIONS")]
    pub coverage_functions: Option<f64>,

    #[arg(long, env = "COVERAGE_BRANCHES")]
    pub coverage_branches: Option<f64>,

    #[arg(long, env = "COVERAGE_STATEMENTS")]
    pub coverage_statements: Option<f64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SummaryArgs {
    #[arg(long, default_value = "index.json")]
    pub report: PathBuf,

    /// Substring matched against branch name, latest commit and actor
    #[arg(long)]
    pub search: Option<String>,

    /// Keep only branches whose latest run has this status
    #[arg(long)]
    pub status: Option<RunStatus>,

    /// Inclusive lower bound on the latest run (RFC 3339)
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the latest run (RFC 3339)
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,

    /// date-desc|date-asc|success-rate-desc|success-rate-asc|coverage-desc|coverage-asc
    #[arg(long, default_value = "date-desc")]
    pub sort: SortKey,

    /// Shortcut criteria (failed|low-coverage|recent); clears the flags above
    #[arg(long)]
    pub preset: Option<String>,

    /// text|markdown|json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChartArgs {
    #[arg(long, default_value = "index.json")]
    pub report: PathBuf,

    /// Drawable width the global trend x axis is scaled to
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Drawable width of the per-branch sparklines
    #[arg(long, default_value_t = 300.0)]
    pub spark_width: f64,

    /// Write the series here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "index.json")]
    pub report: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DemoArgs {
    /// Where the demo report is written
    #[arg(long, default_value = "index.json")]
    pub out: PathBuf,

    /// Overwrite an existing report
    #[arg(long)]
    pub force: bool,
}
