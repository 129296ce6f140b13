//! Repository activity fetching: the wire shapes, the window filters and
//! the paginated HTTP client that ties them together.

pub mod client;
pub mod filter;
pub(crate) mod wire;

pub use client::{GitHubClient, DEFAULT_BASE_URL};
pub use filter::{filter_commits, filter_issues, filter_pulls};
