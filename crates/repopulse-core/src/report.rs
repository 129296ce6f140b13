//! Turns exported markdown digests into prose reports via a [`Summarizer`].
//!
//! The report lands next to its source as `<stem>_report.md`. The generator
//! reads files and hands text to the summarizer; it knows nothing about
//! bundles, stories or windows.

use std::path::{Path, PathBuf};

use crate::domain::Result;
use crate::llm::Summarizer;
use crate::obs;

/// System prompt for repository progress reports.
const PROGRESS_PROMPT: &str = "You are a project status assistant. Turn the \
following repository activity digest into a brief engineering report. Lead \
with the highlights, then cover closed issues, closed pull requests and \
notable commits in plain language. Answer in formatted markdown.";

/// System prompt for front-page news reports.
const NEWS_PROMPT: &str = "You are a technology news editor. Summarize the \
following Hacker News front page snapshot into a short briefing. Group \
related stories, call out the most significant one, and keep each item to a \
sentence. Answer in formatted markdown.";

pub struct ReportGenerator<'a> {
    summarizer: &'a dyn Summarizer,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(summarizer: &'a dyn Summarizer) -> Self {
        Self { summarizer }
    }

    /// Summarize a repository progress digest. Returns the report text and
    /// the path it was written to.
    pub async fn generate_progress_report(
        &self,
        markdown_path: &Path,
    ) -> Result<(String, PathBuf)> {
        self.generate(markdown_path, PROGRESS_PROMPT).await
    }

    /// Summarize a news digest.
    pub async fn generate_news_report(&self, markdown_path: &Path) -> Result<(String, PathBuf)> {
        self.generate(markdown_path, NEWS_PROMPT).await
    }

    async fn generate(&self, markdown_path: &Path, prompt: &str) -> Result<(String, PathBuf)> {
        let markdown = std::fs::read_to_string(markdown_path)?;
        let report = self.summarizer.summarize(prompt, &markdown).await?;

        let report_path = report_path_for(markdown_path);
        std::fs::write(&report_path, &report)?;
        obs::emit_report_generated(markdown_path, &report_path);
        Ok((report, report_path))
    }
}

/// `daily_progress/foo/2024-01-15.md` -> `daily_progress/foo/2024-01-15_report.md`.
fn report_path_for(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("digest");
    source.with_file_name(format!("{}_report.md", stem))
}
