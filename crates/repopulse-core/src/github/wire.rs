//! Wire-format shapes for the repository activity API.
//!
//! Raw JSON is deserialized into these structs and converted into domain
//! records immediately. Timestamps are parsed here, at the boundary; nothing
//! downstream ever compares strings or naive datetimes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{CommitRecord, IssueRecord, PullRequestRecord, PulseError, Result};

/// Parse an ISO-8601 timestamp (`Z` suffix included) into a UTC instant.
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| PulseError::MalformedTimestamp {
            value: raw.to_string(),
            source,
        })
}

fn parse_optional_instant(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(parse_instant).transpose()
}

/// One element of the commits listing.
#[derive(Debug, Deserialize)]
pub(crate) struct CommitItem {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub message: String,
    pub committer: CommitSignature,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitSignature {
    pub date: String,
}

impl TryFrom<CommitItem> for CommitRecord {
    type Error = PulseError;

    fn try_from(item: CommitItem) -> Result<Self> {
        let committed_at = parse_instant(&item.commit.committer.date)?;
        let summary = item
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            sha: item.sha,
            summary,
            committed_at,
        })
    }
}

/// One element of the issues listing.
#[derive(Debug, Deserialize)]
pub(crate) struct IssueItem {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub closed_at: Option<String>,
}

impl TryFrom<IssueItem> for IssueRecord {
    type Error = PulseError;

    fn try_from(item: IssueItem) -> Result<Self> {
        Ok(Self {
            number: item.number,
            title: item.title,
            state: item.state,
            closed_at: parse_optional_instant(item.closed_at.as_deref())?,
        })
    }
}

/// One element of the pull request listing.
#[derive(Debug, Deserialize)]
pub(crate) struct PullItem {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub closed_at: Option<String>,
}

impl TryFrom<PullItem> for PullRequestRecord {
    type Error = PulseError;

    fn try_from(item: PullItem) -> Result<Self> {
        Ok(Self {
            number: item.number,
            title: item.title,
            state: item.state,
            closed_at: parse_optional_instant(item.closed_at.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant_accepts_zulu_suffix() {
        let t = parse_instant("2024-01-15T10:30:00Z").expect("parse");
        assert_eq!(t.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_parse_instant_normalizes_offsets_to_utc() {
        let plus_two = parse_instant("2024-01-15T12:30:00+02:00").expect("parse");
        let zulu = parse_instant("2024-01-15T10:30:00Z").expect("parse");
        assert_eq!(plus_two, zulu);
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        let err = parse_instant("yesterday-ish").expect_err("must fail");
        assert!(matches!(err, PulseError::MalformedTimestamp { ref value, .. } if value == "yesterday-ish"));
    }

    #[test]
    fn test_commit_item_conversion_takes_first_message_line() {
        let json = r#"{
            "sha": "6dcb09b5",
            "commit": {
                "message": "Fix scheduler drift\n\nLong explanation body.",
                "committer": { "date": "2024-01-15T10:00:00Z" }
            }
        }"#;
        let item: CommitItem = serde_json::from_str(json).expect("deserialize");
        let record = CommitRecord::try_from(item).expect("convert");

        assert_eq!(record.sha, "6dcb09b5");
        assert_eq!(record.summary, "Fix scheduler drift");
        assert_eq!(record.committed_at, parse_instant("2024-01-15T10:00:00Z").unwrap());
    }

    #[test]
    fn test_commit_item_conversion_surfaces_bad_timestamp() {
        let json = r#"{
            "sha": "6dcb09b5",
            "commit": {
                "message": "whatever",
                "committer": { "date": "15/01/2024" }
            }
        }"#;
        let item: CommitItem = serde_json::from_str(json).expect("deserialize");
        let err = CommitRecord::try_from(item).expect_err("must fail");
        assert!(matches!(err, PulseError::MalformedTimestamp { .. }));
    }

    #[test]
    fn test_issue_item_null_closed_at_becomes_none() {
        let json = r#"{ "number": 9, "title": "Still open", "state": "open", "closed_at": null }"#;
        let item: IssueItem = serde_json::from_str(json).expect("deserialize");
        let record = IssueRecord::try_from(item).expect("convert");
        assert_eq!(record.closed_at, None);
    }

    #[test]
    fn test_pull_item_conversion() {
        let json = r#"{ "number": 3, "title": "Typed config", "state": "closed", "closed_at": "2024-01-14T08:00:00Z" }"#;
        let item: PullItem = serde_json::from_str(json).expect("deserialize");
        let record = PullRequestRecord::try_from(item).expect("convert");
        assert_eq!(record.number, 3);
        assert_eq!(
            record.closed_at,
            Some(parse_instant("2024-01-14T08:00:00Z").unwrap())
        );
    }
}
