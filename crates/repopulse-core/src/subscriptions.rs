//! Subscribed-repository list, persisted as a JSON array of `owner/name`
//! strings.
//!
//! The file is the source of truth; every operation reads it fresh and
//! writes it back whole. A missing file is an empty list, so first runs
//! need no setup step.

use std::path::{Path, PathBuf};

use crate::domain::{PulseError, RepoId, Result};

pub struct SubscriptionStore {
    path: PathBuf,
}

impl SubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All subscriptions, parse-validated, in file order.
    pub fn list(&self) -> Result<Vec<RepoId>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        let slugs: Vec<String> = serde_json::from_str(&raw)?;
        slugs.iter().map(|slug| slug.parse()).collect()
    }

    /// Add a subscription. Returns `false` when it was already present.
    pub fn add(&self, repo: &RepoId) -> Result<bool> {
        let mut repos = self.list()?;
        if repos.contains(repo) {
            return Ok(false);
        }
        repos.push(repo.clone());
        self.save(&repos)?;
        Ok(true)
    }

    /// Remove a subscription. Removing an absent repository is an error;
    /// silent no-ops would mask typos.
    pub fn remove(&self, repo: &RepoId) -> Result<()> {
        let mut repos = self.list()?;
        let before = repos.len();
        repos.retain(|existing| existing != repo);
        if repos.len() == before {
            return Err(PulseError::NotSubscribed(repo.to_string()));
        }
        self.save(&repos)
    }

    fn save(&self, repos: &[RepoId]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let slugs: Vec<String> = repos.iter().map(RepoId::to_string).collect();
        std::fs::write(&self.path, serde_json::to_string_pretty(&slugs)?)?;
        Ok(())
    }
}
