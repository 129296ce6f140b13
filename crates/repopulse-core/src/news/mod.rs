//! Hacker News front-page collection and rendering.

pub mod client;

pub use client::{render_news, HackerNewsClient, NewsWriter, Story, DEFAULT_STORY_LIMIT};
