//! Activity records and the aggregated update bundle.
//!
//! All records are value objects built once at the wire boundary; downstream
//! filtering and rendering read typed fields, never raw JSON maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::repo::RepoId;
use super::window::TimeWindow;

/// A single commit, keyed by its content identifier rather than its author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    /// Commit SHA.
    pub sha: String,

    /// First line of the commit message.
    pub summary: String,

    /// Committer date. This, not the author date, is the filter key.
    pub committed_at: DateTime<Utc>,
}

/// A repository issue. Only closed issues are requested, but `closed_at`
/// stays optional: an open issue leaking through must fail the filter, not
/// crash it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    /// Issue number within the repository.
    pub number: u64,

    /// Issue title.
    pub title: String,

    /// State as reported by the API, normally `closed`.
    pub state: String,

    /// When the issue was closed, if it ever was.
    pub closed_at: Option<DateTime<Utc>>,
}

/// A pull request. Closed-but-unmerged and merged are not distinguished
/// here; both carry a `closed_at` and both pass the state filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Pull request number within the repository.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// State as reported by the API, normally `closed`.
    pub state: String,

    /// When the pull request was closed, if it ever was.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Everything one aggregation call produced for one repository and window.
///
/// Owned by the caller and handed by value to rendering; no shared state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateBundle {
    /// Repository the activity belongs to.
    pub repo: RepoId,

    /// Window the activity was filtered against.
    pub window: TimeWindow,

    /// Commits within the window, by committer date.
    pub commits: Vec<CommitRecord>,

    /// Issues closed by the window's upper bound.
    pub issues: Vec<IssueRecord>,

    /// Pull requests closed within the window.
    pub pull_requests: Vec<PullRequestRecord>,
}

impl UpdateBundle {
    /// True when no activity of any kind survived filtering.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.issues.is_empty() && self.pull_requests.is_empty()
    }

    /// Total number of records across all three resource types.
    pub fn len(&self) -> usize {
        self.commits.len() + self.issues.len() + self.pull_requests.len()
    }
}
