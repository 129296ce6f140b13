//! Structured observability hooks for aggregation lifecycle events.
//!
//! This module provides emission functions for the key lifecycle events:
//! fetch completion, digest/report writes and per-repository skips.
//!
//! Events are emitted at `info!` level (configurable via `REPOPULSE_LOG`
//! env var). JSON log lines are selected per binary with the `--json`
//! flag, via [`crate::telemetry::init_tracing`].

use std::path::Path;

use tracing::info;

use crate::domain::{RepoId, Resource};

/// Emit event: one resource type fetched and filtered for a repository.
///
/// `kept` is the record count after window filtering, `fetched` the count
/// the listing returned before it.
pub fn emit_fetch_completed(repo: &RepoId, resource: Resource, kept: usize, fetched: usize) {
    info!(
        event = "fetch.completed",
        repo = %repo,
        resource = %resource,
        kept = kept,
        fetched = fetched,
    );
}

/// Emit event: a digest file was written for a repository.
pub fn emit_digest_written(repo: &RepoId, path: &Path, records: usize) {
    info!(
        event = "digest.written",
        repo = %repo,
        path = %path.display(),
        records = records,
    );
}

/// Emit event: a news digest file was written.
pub fn emit_news_digest_written(path: &Path, stories: usize) {
    info!(event = "news.digest_written", path = %path.display(), stories = stories);
}

/// Emit event: a summarized report was written next to its source digest.
pub fn emit_report_generated(source: &Path, report: &Path) {
    info!(
        event = "report.generated",
        source = %source.display(),
        report = %report.display(),
    );
}

/// Emit event: a subscribed repository was skipped after a failure
/// (warning level). The remaining subscriptions still run.
pub fn emit_repo_skipped(repo: &RepoId, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "repo.skipped", repo = %repo, error = %error);
}
