//! Repository, pull request, and registry location references.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::GitHubError;

/// Git reference the registry is always read from.
pub const REGISTRY_REF: &str = "refs/heads/main";

/// A repository on GitHub, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    /// Owning user or organization login.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoRef {
    type Err = GitHubError;

    /// Parse `owner/name`, as found in `GITHUB_REPOSITORY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(GitHubError::InvalidRepository(s.to_owned())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A pull request within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    /// Repository the pull request belongs to.
    pub repo: RepoRef,
    /// Pull request number.
    pub number: u64,
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// Where the signer registry lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryLocation {
    /// Repository holding the registry file.
    pub repo: RepoRef,
    /// Path of the registry file within the repository.
    pub path: String,
    /// Git reference to read the file at.
    pub reference: String,
}

impl RegistryLocation {
    /// Resolve the registry location for a pull request.
    ///
    /// `owner` and `name` override the corresponding half of `base`
    /// independently. `base` must be the pull request's base repository:
    /// the registry is never read from the head repository, which may be
    /// a fork controlled by the contributor.
    #[must_use]
    pub fn resolve(
        base: &RepoRef,
        owner: Option<String>,
        name: Option<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repo: RepoRef {
                owner: owner.unwrap_or_else(|| base.owner.clone()),
                name: name.unwrap_or_else(|| base.name.clone()),
            },
            path: path.into(),
            reference: REGISTRY_REF.to_owned(),
        }
    }
}

impl fmt::Display for RegistryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.repo, self.path, self.reference)
    }
}
