//! Error taxonomy for repopulse.

use std::fmt;

use chrono::{DateTime, Utc};

/// The three categories of repository activity that get aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Commits,
    Issues,
    PullRequests,
}

impl Resource {
    /// REST path segment for this resource type.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Resource::Commits => "commits",
            Resource::Issues => "issues",
            Resource::PullRequests => "pulls",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// repopulse domain errors.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("remote API returned HTTP {status} for {resource} of {repo}")]
    RemoteApi {
        repo: String,
        resource: Resource,
        status: u16,
    },

    #[error("news front page returned HTTP {status}")]
    RemoteNews { status: u16 },

    #[error("summarizer failed: {0}")]
    Summarizer(String),

    #[error("malformed timestamp {value:?}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid repository identifier: {0:?} (expected owner/name)")]
    InvalidRepo(String),

    #[error("invalid time window: since {since} is after until {until}")]
    WindowOrder {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    #[error("range mode needs at least one day")]
    EmptyRange,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("not subscribed: {0}")]
    NotSubscribed(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repopulse operations.
pub type Result<T> = std::result::Result<T, PulseError>;
