//! Failures raised at the report load/save boundary.
//!
//! Derivations are total over a valid [`crate::model::Report`]: a branch
//! with no runs or a run with no coverage is an expected data state handled
//! by per-derivation defaults, never an error. Only the boundary rejects.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access report {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("report is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload parsed but lacks one of the required top-level keys.
    #[error("report is missing required field `{field}`")]
    MissingField { field: &'static str },

    /// Required keys were present but the typed decode failed.
    #[error("report failed schema decode: {0}")]
    Decode(#[source] serde_json::Error),
}
