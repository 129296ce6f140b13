//! Client-side temporal filtering of activity records.
//!
//! Comparisons are inclusive and always over UTC instants. The three
//! resource types do not share one rule:
//!
//! - commits: both bounds, against the committer date;
//! - issues: upper bound only, against `closed_at`;
//! - pull requests: both bounds, against `closed_at`.
//!
//! The missing lower bound for issues is long-standing observable behavior.
//! Downstream reports count on it (an issue closed long before the window
//! still shows up in a daily digest); changing it is a semantics break, not
//! a cleanup. A record with no `closed_at` fails its filter silently.

use crate::domain::{CommitRecord, IssueRecord, PullRequestRecord, TimeWindow};

/// Keep commits whose committer date lies within the window, inclusively.
pub fn filter_commits(commits: Vec<CommitRecord>, window: &TimeWindow) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter(|c| window.contains(c.committed_at))
        .collect()
}

/// Keep issues closed by the window's upper bound. The lower bound is
/// deliberately not applied.
pub fn filter_issues(issues: Vec<IssueRecord>, window: &TimeWindow) -> Vec<IssueRecord> {
    issues
        .into_iter()
        .filter(|i| i.closed_at.map_or(false, |t| window.ends_by(t)))
        .collect()
}

/// Keep pull requests closed within the window, inclusively on both ends.
pub fn filter_pulls(
    pulls: Vec<PullRequestRecord>,
    window: &TimeWindow,
) -> Vec<PullRequestRecord> {
    pulls
        .into_iter()
        .filter(|p| p.closed_at.map_or(false, |t| window.contains(t)))
        .collect()
}
