//! Repository identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PulseError;

/// Owner/name pair uniquely identifying a remote repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// Account or organisation owning the repository.
    pub owner: String,

    /// Repository name within the owner's namespace.
    pub name: String,
}

impl RepoId {
    /// Create an identifier from already-validated parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Filesystem-safe form, `owner_name`, used for per-repository directories.
    pub fn slug(&self) -> String {
        format!("{}_{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = PulseError;

    /// Parse `owner/name`. Exactly one separator, both parts non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(PulseError::InvalidRepo(s.to_string())),
        }
    }
}
