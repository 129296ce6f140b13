//! HTTP client for the repository activity API.
//!
//! One `reqwest::Client` per instance, authenticated with a static bearer
//! token supplied at construction. Listing endpoints are paginated; every
//! page of every resource type is fetched before filtering. There are no
//! retries: a non-2xx response fails the resource type, which fails the
//! whole aggregation.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::domain::{
    CommitRecord, IssueRecord, PullRequestRecord, PulseError, RepoId, Resource, Result,
    TimeWindow, UpdateBundle,
};
use crate::obs;

use super::filter::{filter_commits, filter_issues, filter_pulls};
use super::wire::{CommitItem, IssueItem, PullItem};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size requested from listing endpoints.
const PER_PAGE: usize = 100;

const API_VERSION: &str = "2022-11-28";

/// Client for fetching and aggregating repository activity.
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Create a client against the public API host.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom host (enterprise deployments, tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repopulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all commits for `repo`, every page, converted to typed records.
    ///
    /// `since`/`until` are forwarded as query parameters so the server can
    /// narrow the listing; the definitive filtering still happens client-side.
    pub async fn fetch_commits(
        &self,
        repo: &RepoId,
        window: &TimeWindow,
    ) -> Result<Vec<CommitRecord>> {
        let raw: Vec<CommitItem> = self
            .fetch_pages(repo, Resource::Commits, window_params(window))
            .await?;
        raw.into_iter().map(CommitRecord::try_from).collect()
    }

    /// Fetch all closed issues for `repo`.
    ///
    /// The state is restricted server-side; the window parameters are
    /// forwarded but this endpoint does not honour them the way the commit
    /// endpoint does, so callers must not trust the listing to be windowed.
    pub async fn fetch_issues(
        &self,
        repo: &RepoId,
        window: &TimeWindow,
    ) -> Result<Vec<IssueRecord>> {
        let mut params = vec![("state".to_string(), "closed".to_string())];
        params.extend(window_params(window));
        let raw: Vec<IssueItem> = self.fetch_pages(repo, Resource::Issues, params).await?;
        raw.into_iter().map(IssueRecord::try_from).collect()
    }

    /// Fetch all closed pull requests for `repo`. Same caveats as
    /// [`GitHubClient::fetch_issues`].
    pub async fn fetch_pull_requests(
        &self,
        repo: &RepoId,
        window: &TimeWindow,
    ) -> Result<Vec<PullRequestRecord>> {
        let mut params = vec![("state".to_string(), "closed".to_string())];
        params.extend(window_params(window));
        let raw: Vec<PullItem> = self
            .fetch_pages(repo, Resource::PullRequests, params)
            .await?;
        raw.into_iter().map(PullRequestRecord::try_from).collect()
    }

    /// Aggregate one repository's activity over `window`.
    ///
    /// The three resource types are fetched sequentially with the same
    /// window, each pruned by its own rule. The first failure aborts the
    /// call; a partial bundle is never returned.
    #[instrument(skip(self, window), fields(repo = %repo))]
    pub async fn aggregate(&self, repo: &RepoId, window: &TimeWindow) -> Result<UpdateBundle> {
        let fetched = self.fetch_commits(repo, window).await?;
        let fetched_count = fetched.len();
        let commits = filter_commits(fetched, window);
        obs::emit_fetch_completed(repo, Resource::Commits, commits.len(), fetched_count);

        let fetched = self.fetch_issues(repo, window).await?;
        let fetched_count = fetched.len();
        let issues = filter_issues(fetched, window);
        obs::emit_fetch_completed(repo, Resource::Issues, issues.len(), fetched_count);

        let fetched = self.fetch_pull_requests(repo, window).await?;
        let fetched_count = fetched.len();
        let pull_requests = filter_pulls(fetched, window);
        obs::emit_fetch_completed(repo, Resource::PullRequests, pull_requests.len(), fetched_count);

        Ok(UpdateBundle {
            repo: repo.clone(),
            window: *window,
            commits,
            issues,
            pull_requests,
        })
    }

    /// Aggregate today's activity: midnight UTC of the current day, no
    /// upper bound.
    pub async fn aggregate_daily(&self, repo: &RepoId) -> Result<UpdateBundle> {
        self.aggregate(repo, &TimeWindow::daily()).await
    }

    /// Aggregate the trailing `days` calendar days, midnight to midnight.
    pub async fn aggregate_range(&self, repo: &RepoId, days: u32) -> Result<UpdateBundle> {
        let window = TimeWindow::range(days)?;
        self.aggregate(repo, &window).await
    }

    async fn fetch_pages<T>(
        &self,
        repo: &RepoId,
        resource: Resource,
        base_query: Vec<(String, String)>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.base_url,
            repo.owner,
            repo.name,
            resource.path_segment()
        );

        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut query = base_query.clone();
            query.push(("per_page".to_string(), PER_PAGE.to_string()));
            query.push(("page".to_string(), page.to_string()));

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", API_VERSION)
                .query(&query)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(PulseError::RemoteApi {
                    repo: repo.to_string(),
                    resource,
                    status: status.as_u16(),
                });
            }

            let batch: Vec<T> = response.json().await?;
            let count = batch.len();
            debug!(resource = %resource, page, count, "fetched activity page");
            items.extend(batch);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Window bounds as RFC-3339 query parameters, `Z`-suffixed.
fn window_params(window: &TimeWindow) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(since) = window.since {
        params.push(("since".to_string(), format_instant(since)));
    }
    if let Some(until) = window.until {
        params.push(("until".to_string(), format_instant(until)));
    }
    params
}

fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_window_params_use_zulu_suffix() {
        let window = TimeWindow::new(
            Some(instant("2024-01-08T00:00:00Z")),
            Some(instant("2024-01-15T00:00:00Z")),
        )
        .expect("valid window");

        let params = window_params(&window);
        assert_eq!(
            params,
            vec![
                ("since".to_string(), "2024-01-08T00:00:00Z".to_string()),
                ("until".to_string(), "2024-01-15T00:00:00Z".to_string()),
            ]
        );
    }

    #[test]
    fn test_window_params_skip_absent_bounds() {
        let params = window_params(&TimeWindow::unbounded());
        assert!(params.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            GitHubClient::with_base_url("token", "https://ghe.example.com/api/v3/").expect("client");
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
    }
}
