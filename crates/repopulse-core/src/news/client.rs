//! Hacker News front page via the public JSON API.
//!
//! Two endpoints: `topstories.json` for the ranked id list and
//! `item/{id}.json` for each story. A failed id-list fetch is an error; a
//! failed individual story is skipped, it is front-page glue rather than
//! aggregation data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{PulseError, Result};
use crate::obs;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Front page size; the story cap defaults to this.
pub const DEFAULT_STORY_LIMIT: usize = 30;

const DISCUSSION_URL: &str = "https://news.ycombinator.com/item?id=";

/// One front-page story. `url` falls back to the discussion page when the
/// story has no external link (Ask HN posts and similar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct StoryItem {
    title: Option<String>,
    url: Option<String>,
}

/// Client for the front-page story listing.
pub struct HackerNewsClient {
    http: reqwest::Client,
    base_url: String,
    story_limit: usize,
}

impl HackerNewsClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repopulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            story_limit: DEFAULT_STORY_LIMIT,
        })
    }

    /// Cap the number of stories fetched per call.
    pub fn with_story_limit(mut self, limit: usize) -> Self {
        self.story_limit = limit;
        self
    }

    /// Fetch the top front-page stories in rank order.
    pub async fn top_stories(&self) -> Result<Vec<Story>> {
        let url = format!("{}/topstories.json", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::RemoteNews {
                status: status.as_u16(),
            });
        }
        let ids: Vec<u64> = response.json().await?;

        let mut stories = Vec::new();
        for id in ids.into_iter().take(self.story_limit) {
            match self.fetch_story(id).await {
                Ok(Some(story)) => stories.push(story),
                // Dead items and title-less entries are not stories.
                Ok(None) => {}
                Err(error) => {
                    debug!(id, error = %error, "skipping unfetchable story");
                }
            }
        }
        Ok(stories)
    }

    async fn fetch_story(&self, id: u64) -> Result<Option<Story>> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::RemoteNews {
                status: status.as_u16(),
            });
        }
        // The API answers `null` for ids it no longer knows.
        let item: Option<StoryItem> = response.json().await?;
        Ok(item.and_then(|item| {
            let title = item.title?;
            let url = item
                .url
                .unwrap_or_else(|| format!("{}{}", DISCUSSION_URL, id));
            Some(Story { title, url })
        }))
    }
}

/// Render front-page stories as markdown, numbered in rank order.
pub fn render_news(stories: &[Story], date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Hacker News for ({})\n\n", date));
    for (idx, story) in stories.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, story.title));
        out.push_str(&format!("   Link: {}\n", story.url));
    }
    out
}

/// Writes rendered news digests under a fixed output root.
pub struct NewsWriter {
    root: PathBuf,
}

impl NewsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the stories to `<root>/hacker_news_<date>.md` and return the
    /// path.
    pub fn write(&self, stories: &[Story], date: NaiveDate) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("hacker_news_{}.md", date));
        std::fs::write(&path, render_news(stories, date))?;
        obs::emit_news_digest_written(&path, stories.len());
        Ok(path)
    }
}
