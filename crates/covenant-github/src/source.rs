//! Seams between gate orchestration and the data sources it reads.

use async_trait::async_trait;
use covenant_core::CommitAuthorship;

use crate::error::GitHubError;
use crate::repo::{PullRequestRef, RegistryLocation};

/// Supplies the commits of a pull request.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// List the pull request's commits in order, each with its authorship.
    async fn list_commits(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<CommitAuthorship>, GitHubError>;
}

/// Supplies the raw signer registry document.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetch the raw bytes of the registry file.
    async fn fetch_registry(&self, location: &RegistryLocation) -> Result<Vec<u8>, GitHubError>;
}
