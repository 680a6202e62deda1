//! Branch list selection: which branches are shown, in which order.
//!
//! Criteria are an explicit immutable value owned by whoever drives the
//! page session; there is no ambient filter state. Filters are a
//! conjunction and an absent criterion always matches. Sorting is stable so
//! ties keep their prior relative order and paging stays reproducible.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::model::{BranchRecord, RunStatus};

/// Comparator applied to the filtered branch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    SuccessRateDesc,
    SuccessRateAsc,
    CoverageDesc,
    CoverageAsc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "success-rate-desc" => Ok(Self::SuccessRateDesc),
            "success-rate-asc" => Ok(Self::SuccessRateAsc),
            "coverage-desc" => Ok(Self::CoverageDesc),
            "coverage-asc" => Ok(Self::CoverageAsc),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::SuccessRateDesc => "success-rate-desc",
            Self::SuccessRateAsc => "success-rate-asc",
            Self::CoverageDesc => "coverage-desc",
            Self::CoverageAsc => "coverage-asc",
        })
    }
}

/// User-selected filter and sort state for the branch list.
///
/// The default value is the reset state: no filters, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewCriteria {
    /// Case-insensitive substring matched against branch name, latest-run
    /// commit and latest-run actor; any hit keeps the branch.
    pub search: Option<String>,
    /// Exact match against the latest run's status.
    pub status: Option<RunStatus>,
    /// Inclusive lower bound on the latest run's timestamp.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the latest run's timestamp.
    pub date_to: Option<DateTime<Utc>>,
    pub sort: SortKey,
}

impl ViewCriteria {
    /// Preset: branches whose latest run failed, no other filters.
    pub fn failed() -> Self {
        Self {
            status: Some(RunStatus::Failed),
            ..Self::default()
        }
    }

    /// Preset: all branches, lowest mean coverage first.
    pub fn low_coverage() -> Self {
        Self {
            sort: SortKey::CoverageAsc,
            ..Self::default()
        }
    }

    /// Preset: all branches, most recent activity first.
    pub fn recent() -> Self {
        Self {
            sort: SortKey::DateDesc,
            ..Self::default()
        }
    }
}

/// Select and order branches for display.
///
/// Branches without a latest run are never shown regardless of criteria.
pub fn select<'a>(
    branches: &'a BTreeMap<String, BranchRecord>,
    criteria: &ViewCriteria,
) -> Vec<(&'a str, &'a BranchRecord)> {
    let needle = criteria
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|s| !s.is_empty());

    let mut rows: Vec<(&str, &BranchRecord)> = branches
        .iter()
        .filter_map(|(name, branch)| {
            let latest = branch.latest_run()?;

            let search_ok = needle.as_deref().is_none_or(|needle| {
                name.to_lowercase().contains(needle)
                    || latest
                        .commit
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(needle))
                    || latest
                        .actor
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(needle))
            });
            let status_ok = criteria.status.is_none_or(|wanted| latest.status == wanted);
            let from_ok = criteria
                .date_from
                .is_none_or(|from| latest.timestamp >= from);
            let to_ok = criteria.date_to.is_none_or(|to| latest.timestamp <= to);

            (search_ok && status_ok && from_ok && to_ok).then_some((name.as_str(), branch))
        })
        .collect();

    rows.sort_by(|&(_, a), &(_, b)| compare(criteria.sort, a, b));
    rows
}

fn compare(sort: SortKey, a: &BranchRecord, b: &BranchRecord) -> Ordering {
    // Selection guarantees a latest run on both sides.
    let (Some(a_latest), Some(b_latest)) = (a.latest_run(), b.latest_run()) else {
        return Ordering::Equal;
    };
    match sort {
        SortKey::DateDesc => b_latest.timestamp.cmp(&a_latest.timestamp),
        SortKey::DateAsc => a_latest.timestamp.cmp(&b_latest.timestamp),
        SortKey::SuccessRateDesc => b.success_fraction().total_cmp(&a.success_fraction()),
        SortKey::SuccessRateAsc => a.success_fraction().total_cmp(&b.success_fraction()),
        SortKey::CoverageDesc => b_latest
            .average_coverage()
            .total_cmp(&a_latest.average_coverage()),
        SortKey::CoverageAsc => a_latest
            .average_coverage()
            .total_cmp(&b_latest.average_coverage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageSnapshot, Run};
    use chrono::{Duration, Utc};

    fn run(status: RunStatus, offset_mins: i64) -> Run {
        Run {
            run_number: "1".into(),
            status,
            timestamp: Utc::now() + Duration::minutes(offset_mins),
            duration: None,
            error: None,
            coverage: None,
            actor: Some("brukGit".into()),
            commit: Some("a147232e328b".into()),
            short_commit: Some("a147232".into()),
            workflow_url: None,
        }
    }

    fn branch_with(successful: u64, total: u64, latest: Run) -> BranchRecord {
        BranchRecord {
            total_runs: total,
            successful_runs: successful,
            runs: vec![latest],
            folder_structure: None,
        }
    }

    fn names(rows: &[(&str, &BranchRecord)]) -> Vec<String> {
        rows.iter().map(|(name, _)| (*name).to_string()).collect()
    }

    #[test]
    fn status_filter_keeps_only_matching_latest() {
        let mut branches = BTreeMap::new();
        branches.insert("a".into(), branch_with(0, 1, run(RunStatus::Failed, 0)));
        branches.insert("b".into(), branch_with(1, 1, run(RunStatus::Success, 0)));

        let rows = select(&branches, &ViewCriteria::failed());
        assert_eq!(names(&rows), ["a"]);
    }

    #[test]
    fn runless_branches_are_never_shown() {
        let mut branches = BTreeMap::new();
        branches.insert("empty".into(), BranchRecord::default());
        branches.insert("live".into(), branch_with(1, 1, run(RunStatus::Success, 0)));

        assert_eq!(names(&select(&branches, &ViewCriteria::default())), ["live"]);
        assert_eq!(names(&select(&branches, &ViewCriteria::failed())), Vec::<String>::new());
    }

    #[test]
    fn success_rate_sort_orders_both_directions() {
        let mut branches = BTreeMap::new();
        branches.insert("half".into(), branch_with(1, 2, run(RunStatus::Success, 0)));
        branches.insert("full".into(), branch_with(2, 2, run(RunStatus::Success, 0)));
        branches.insert("zero".into(), branch_with(0, 2, run(RunStatus::Failed, 0)));

        let desc = ViewCriteria {
            sort: SortKey::SuccessRateDesc,
            ..ViewCriteria::default()
        };
        assert_eq!(names(&select(&branches, &desc)), ["full", "half", "zero"]);

        let asc = ViewCriteria {
            sort: SortKey::SuccessRateAsc,
            ..ViewCriteria::default()
        };
        assert_eq!(names(&select(&branches, &asc)), ["zero", "half", "full"]);
    }

    #[test]
    fn search_matches_name_commit_or_actor() {
        let mut branches = BTreeMap::new();
        branches.insert("feature/login".into(), branch_with(1, 1, run(RunStatus::Success, 0)));

        let by_name = ViewCriteria {
            search: Some("LOGIN".into()),
            ..ViewCriteria::default()
        };
        assert_eq!(select(&branches, &by_name).len(), 1);

        let by_commit = ViewCriteria {
            search: Some("a147".into()),
            ..ViewCriteria::default()
        };
        assert_eq!(select(&branches, &by_commit).len(), 1);

        let by_actor = ViewCriteria {
            search: Some("brukgit".into()),
            ..ViewCriteria::default()
        };
        assert_eq!(select(&branches, &by_actor).len(), 1);

        let miss = ViewCriteria {
            search: Some("nothing-here".into()),
            ..ViewCriteria::default()
        };
        assert!(select(&branches, &miss).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let latest = run(RunStatus::Success, 0);
        let stamp = latest.timestamp;
        let mut branches = BTreeMap::new();
        branches.insert("main".into(), branch_with(1, 1, latest));

        let exact = ViewCriteria {
            date_from: Some(stamp),
            date_to: Some(stamp),
            ..ViewCriteria::default()
        };
        assert_eq!(select(&branches, &exact).len(), 1);

        let excluded = ViewCriteria {
            date_from: Some(stamp + Duration::seconds(1)),
            ..ViewCriteria::default()
        };
        assert!(select(&branches, &excluded).is_empty());
    }

    #[test]
    fn coverage_sort_treats_missing_snapshot_as_zero() {
        let mut covered = run(RunStatus::Success, 0);
        covered.coverage = Some(CoverageSnapshot {
            lines: 80.0,
            functions: 80.0,
            branches: 80.0,
            statements: 80.0,
        });
        let mut branches = BTreeMap::new();
        branches.insert("covered".into(), branch_with(1, 1, covered));
        branches.insert("bare".into(), branch_with(1, 1, run(RunStatus::Success, 0)));

        let asc = ViewCriteria {
            sort: SortKey::CoverageAsc,
            ..ViewCriteria::default()
        };
        assert_eq!(names(&select(&branches, &asc)), ["bare", "covered"]);
    }

    #[test]
    fn ties_keep_prior_relative_order() {
        // Identical fractions: stable sort must preserve map order.
        let mut branches = BTreeMap::new();
        branches.insert("alpha".into(), branch_with(1, 2, run(RunStatus::Success, 0)));
        branches.insert("beta".into(), branch_with(2, 4, run(RunStatus::Success, 5)));

        let desc = ViewCriteria {
            sort: SortKey::SuccessRateDesc,
            ..ViewCriteria::default()
        };
        assert_eq!(names(&select(&branches, &desc)), ["alpha", "beta"]);
    }

    #[test]
    fn sort_key_parses_kebab_names() {
        assert_eq!("date-desc".parse::<SortKey>(), Ok(SortKey::DateDesc));
        assert_eq!("coverage-asc".parse::<SortKey>(), Ok(SortKey::CoverageAsc));
        assert!("alphabetical".parse::<SortKey>().is_err());
        assert_eq!(SortKey::SuccessRateDesc.to_string(), "success-rate-desc");
    }
}
