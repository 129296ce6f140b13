//! repopulse core library
//!
//! Fetches repository activity (commits, closed issues, closed pull
//! requests) over explicit UTC time windows, renders it as markdown
//! digests, and optionally summarizes digests into prose reports. All
//! filtering happens client-side on normalized timestamps; remote listings
//! are never trusted to be windowed.

pub mod config;
pub mod digest;
pub mod domain;
pub mod github;
pub mod llm;
pub mod news;
pub mod obs;
pub mod report;
pub mod subscriptions;
pub mod telemetry;

pub use domain::{
    CommitRecord, IssueRecord, PullRequestRecord, PulseError, RepoId, Resource, Result,
    TimeWindow, UpdateBundle,
};

pub use config::{Config, LlmConfig, NewsConfig, ScheduleConfig};
pub use digest::{render_digest, window_label, DigestWriter};
pub use github::{filter_commits, filter_issues, filter_pulls, GitHubClient};
pub use llm::{DryRunSummarizer, OpenAiSummarizer, Summarizer};
pub use news::{render_news, HackerNewsClient, NewsWriter, Story};
pub use report::ReportGenerator;
pub use subscriptions::SubscriptionStore;

pub use obs::{
    emit_digest_written, emit_fetch_completed, emit_news_digest_written, emit_repo_skipped,
    emit_report_generated,
};
pub use telemetry::init_tracing;

/// repopulse version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
