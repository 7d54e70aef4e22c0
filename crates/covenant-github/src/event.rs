//! The Actions event payload that triggered the run.
//!
//! GitHub Actions writes the webhook payload of the triggering event to the
//! file named by `GITHUB_EVENT_PATH`. Only `pull_request` and
//! `pull_request_target` payloads carry the `pull_request` object the gate
//! needs; every other event is rejected up front.

use std::path::Path;

use serde::Deserialize;

use crate::error::GitHubError;
use crate::repo::RepoRef;

/// The parts of a pull-request event the gate relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Pull request number.
    pub number: u64,
    /// The repository the pull request targets.
    pub base: RepoRef,
    /// Number of commits GitHub reports for the pull request.
    pub commits: u64,
}

#[derive(Deserialize)]
struct Payload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
    commits: u64,
    base: BasePayload,
}

#[derive(Deserialize)]
struct BasePayload {
    repo: RepoPayload,
}

#[derive(Deserialize)]
struct RepoPayload {
    name: String,
    owner: OwnerPayload,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

impl PullRequestEvent {
    /// Parse an event payload.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NoPullRequestContext`] if the payload has no
    /// `pull_request` object, or [`GitHubError::InvalidEvent`] if it is not
    /// JSON or the pull request lacks its number, commit count or base
    /// repository.
    pub fn from_json(json: &str) -> Result<Self, GitHubError> {
        let payload: Payload = serde_json::from_str(json)?;
        let pr = payload.pull_request.ok_or(GitHubError::NoPullRequestContext)?;
        Ok(Self {
            number: pr.number,
            base: RepoRef::new(pr.base.repo.owner.login, pr.base.repo.name),
            commits: pr.commits,
        })
    }

    /// Read and parse the event payload file.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::EventIo`] if the file cannot be read, and the
    /// errors of [`Self::from_json`] otherwise.
    pub fn from_file(path: &Path) -> Result<Self, GitHubError> {
        let json = std::fs::read_to_string(path).map_err(|source| GitHubError::EventIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
