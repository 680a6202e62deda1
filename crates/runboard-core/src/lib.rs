//! Report aggregation and view-model derivation for the Runboard CI
//! dashboard.
//!
//! One JSON report file accumulates per-branch run history; this crate owns
//! the report's data model and invariants, the ingestion path that appends a
//! run after each CI execution, the rollup math, the filter/sort engine
//! behind the branch list, and the chart series derivations. Rendering and
//! transport stay outside: consumers read the derived values and paint them.

pub mod error;
pub mod ingest;
pub mod model;
pub mod rollup;
pub mod store;
pub mod trend;
pub mod view;

pub use error::ReportError;
pub use model::{BranchRecord, CoverageSnapshot, LatestRun, Report, Run, RunStatus};
