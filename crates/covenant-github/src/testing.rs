//! In-memory stand-in for GitHub.
//!
//! `FakeGitHub` implements both data-source traits from canned data and
//! records every call, so tests can assert what was fetched and in which
//! order without a network.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use covenant_core::CommitAuthorship;

use crate::error::GitHubError;
use crate::repo::{PullRequestRef, RegistryLocation};
use crate::source::{CommitSource, RegistrySource};

/// A recorded call against [`FakeGitHub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    /// `list_commits` for a pull request.
    ListCommits(PullRequestRef),
    /// `fetch_registry` for a location.
    FetchRegistry(RegistryLocation),
}

/// Canned responses for the commit and registry sources.
///
/// A source without canned data answers with a 404 [`GitHubError::Api`].
#[derive(Debug, Default)]
pub struct FakeGitHub {
    commits: Option<Vec<CommitAuthorship>>,
    registry: Option<Vec<u8>>,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeGitHub {
    /// A fake with no canned data.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `commits` from `list_commits`.
    #[must_use]
    pub fn with_commits(mut self, commits: Vec<CommitAuthorship>) -> Self {
        self.commits = Some(commits);
        self
    }

    /// Serve `document` from `fetch_registry`.
    #[must_use]
    pub fn with_registry(mut self, document: impl Into<Vec<u8>>) -> Self {
        self.registry = Some(document.into());
        self
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: FakeCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn not_found(url: String) -> GitHubError {
        GitHubError::Api {
            status: 404,
            url,
            message: "Not Found".to_owned(),
        }
    }
}

#[async_trait]
impl CommitSource for FakeGitHub {
    async fn list_commits(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<CommitAuthorship>, GitHubError> {
        self.record(FakeCall::ListCommits(pull_request.clone()));
        self.commits
            .clone()
            .ok_or_else(|| Self::not_found(format!("fake://pulls/{pull_request}")))
    }
}

#[async_trait]
impl RegistrySource for FakeGitHub {
    async fn fetch_registry(&self, location: &RegistryLocation) -> Result<Vec<u8>, GitHubError> {
        self.record(FakeCall::FetchRegistry(location.clone()));
        self.registry
            .clone()
            .ok_or_else(|| Self::not_found(format!("fake://contents/{location}")))
    }
}
