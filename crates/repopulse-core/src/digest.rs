//! Markdown digests for aggregated repository activity.
//!
//! Rendering is pure; only [`DigestWriter`] touches the filesystem. Section
//! headings are always written, items or not, so consumers can diff
//! successive digests of the same repository.

use std::path::{Path, PathBuf};

use crate::domain::{Result, TimeWindow, UpdateBundle};
use crate::obs;

/// Filename stem for a window: `YYYY-MM-DD` for a daily window,
/// `YYYY-MM-DD_to_YYYY-MM-DD` for a ranged one.
pub fn window_label(window: &TimeWindow) -> String {
    match (window.since, window.until) {
        (Some(since), None) => since.date_naive().to_string(),
        (Some(since), Some(until)) => {
            format!("{}_to_{}", since.date_naive(), until.date_naive())
        }
        _ => "all".to_string(),
    }
}

/// Render a bundle as markdown.
pub fn render_digest(bundle: &UpdateBundle) -> String {
    let mut out = String::new();

    match (bundle.window.since, bundle.window.until) {
        (Some(since), None) => {
            out.push_str(&format!(
                "# Daily Progress for {} ({})\n\n",
                bundle.repo,
                since.date_naive()
            ));
            out.push_str("## Issues Closed Today\n");
        }
        (Some(since), Some(until)) => {
            let since_date = since.date_naive();
            let until_date = until.date_naive();
            out.push_str(&format!(
                "# Progress for {} ({} to {})\n\n",
                bundle.repo, since_date, until_date
            ));
            out.push_str(&format!(
                "## Issues Closed in the Last {} Days\n",
                (until_date - since_date).num_days()
            ));
        }
        _ => {
            out.push_str(&format!("# Progress for {}\n\n", bundle.repo));
            out.push_str("## Issues Closed\n");
        }
    }
    for issue in &bundle.issues {
        out.push_str(&format!("- {} #{}\n", issue.title, issue.number));
    }

    out.push_str("\n## Pull Requests Closed\n");
    for pull in &bundle.pull_requests {
        out.push_str(&format!("- {} #{}\n", pull.title, pull.number));
    }

    out.push_str("\n## Commits\n");
    for commit in &bundle.commits {
        let short = commit.sha.get(..7).unwrap_or(commit.sha.as_str());
        out.push_str(&format!("- {} ({})\n", commit.summary, short));
    }

    out
}

/// Writes rendered digests under a fixed output root, one subdirectory per
/// repository.
pub struct DigestWriter {
    root: PathBuf,
}

impl DigestWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root the writer was created with.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bundle` to `<root>/<owner_name>/<label>.md`, creating
    /// directories as needed, and return the path.
    pub fn write(&self, bundle: &UpdateBundle) -> Result<PathBuf> {
        let dir = self.root.join(bundle.repo.slug());
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.md", window_label(&bundle.window)));
        std::fs::write(&path, render_digest(bundle))?;
        obs::emit_digest_written(&bundle.repo, &path, bundle.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommitRecord, IssueRecord, PullRequestRecord, RepoId};
    use chrono::{DateTime, Utc};

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    fn sample_bundle(window: TimeWindow) -> UpdateBundle {
        UpdateBundle {
            repo: RepoId::new("rust-lang", "rust"),
            window,
            commits: vec![CommitRecord {
                sha: "abc1234def5678".to_string(),
                summary: "Update dependency pins".to_string(),
                committed_at: instant("2024-01-15T09:30:00Z"),
            }],
            issues: vec![IssueRecord {
                number: 12345,
                title: "Fix ICE in borrow checker".to_string(),
                state: "closed".to_string(),
                closed_at: Some(instant("2024-01-15T10:00:00Z")),
            }],
            pull_requests: vec![PullRequestRecord {
                number: 999,
                title: "Stabilize lazy_cell".to_string(),
                state: "closed".to_string(),
                closed_at: Some(instant("2024-01-15T11:00:00Z")),
            }],
        }
    }

    #[test]
    fn test_daily_digest_render_is_stable() {
        let window = TimeWindow::new(Some(instant("2024-01-15T00:00:00Z")), None)
            .expect("valid window");
        let actual = render_digest(&sample_bundle(window));
        let expected = "# Daily Progress for rust-lang/rust (2024-01-15)\n\n\
            ## Issues Closed Today\n\
            - Fix ICE in borrow checker #12345\n\
            \n\
            ## Pull Requests Closed\n\
            - Stabilize lazy_cell #999\n\
            \n\
            ## Commits\n\
            - Update dependency pins (abc1234)\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_range_digest_render_is_stable() {
        let window = TimeWindow::new(
            Some(instant("2024-01-08T00:00:00Z")),
            Some(instant("2024-01-15T00:00:00Z")),
        )
        .expect("valid window");
        let actual = render_digest(&sample_bundle(window));
        let expected = "# Progress for rust-lang/rust (2024-01-08 to 2024-01-15)\n\n\
            ## Issues Closed in the Last 7 Days\n\
            - Fix ICE in borrow checker #12345\n\
            \n\
            ## Pull Requests Closed\n\
            - Stabilize lazy_cell #999\n\
            \n\
            ## Commits\n\
            - Update dependency pins (abc1234)\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_sections_keep_headings() {
        let window = TimeWindow::new(Some(instant("2024-01-15T00:00:00Z")), None)
            .expect("valid window");
        let bundle = UpdateBundle {
            repo: RepoId::new("rust-lang", "rust"),
            window,
            commits: vec![],
            issues: vec![],
            pull_requests: vec![],
        };
        let actual = render_digest(&bundle);
        let expected = "# Daily Progress for rust-lang/rust (2024-01-15)\n\n\
            ## Issues Closed Today\n\
            \n\
            ## Pull Requests Closed\n\
            \n\
            ## Commits\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_window_label_forms() {
        let daily = TimeWindow::new(Some(instant("2024-01-15T00:00:00Z")), None)
            .expect("valid window");
        assert_eq!(window_label(&daily), "2024-01-15");

        let range = TimeWindow::new(
            Some(instant("2024-01-08T00:00:00Z")),
            Some(instant("2024-01-15T00:00:00Z")),
        )
        .expect("valid window");
        assert_eq!(window_label(&range), "2024-01-08_to_2024-01-15");

        assert_eq!(window_label(&TimeWindow::unbounded()), "all");
    }

    #[test]
    fn test_writer_places_digest_under_repo_slug() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = DigestWriter::new(dir.path());

        let window = TimeWindow::new(Some(instant("2024-01-15T00:00:00Z")), None)
            .expect("valid window");
        let path = writer.write(&sample_bundle(window)).expect("write digest");

        assert_eq!(
            path,
            dir.path().join("rust-lang_rust").join("2024-01-15.md")
        );
        let content = std::fs::read_to_string(&path).expect("read digest back");
        assert!(content.starts_with("# Daily Progress for rust-lang/rust"));
    }
}
