//! Exit codes shared by every subcommand. Part of the CI contract:
//! downstream pipeline steps branch on these.
//!
//! 1 is deliberately unused — it belongs to the test step itself; the
//! report update runs after it and must not re-fail the job.

pub const OK: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Bad report schema or invalid arguments
pub const INFRA_ERROR: i32 = 3; // Filesystem write failed; the CI job fails loudly
