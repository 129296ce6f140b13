//! Domain models for repopulse.
//!
//! Canonical definitions for the core entities:
//! - `RepoId`: owner/name repository identifier
//! - `TimeWindow`: inclusive since/until bounds
//! - `CommitRecord` / `IssueRecord` / `PullRequestRecord`: typed activity
//! - `UpdateBundle`: one aggregation result per repository per window

pub mod activity;
pub mod error;
pub mod repo;
pub mod window;

// Re-export main types and errors
pub use activity::{CommitRecord, IssueRecord, PullRequestRecord, UpdateBundle};
pub use error::{PulseError, Resource, Result};
pub use repo::RepoId;
pub use window::TimeWindow;
