//! End-to-end evaluation of one pull request.
//!
//! The `evaluate` function runs the gate as a single linear sequence:
//! commits are fetched and attributed first, and the registry is only
//! fetched once every commit has a known author.

use covenant_core::{AuthorSet, MissingSet, Outcome, SignerRegistry};
use serde::Serialize;
use tracing::info;

use crate::error::{GateError, GitHubError};
use crate::repo::{PullRequestRef, RegistryLocation};
use crate::source::{CommitSource, RegistrySource};

/// What to evaluate and where the registry lives.
#[derive(Debug, Clone, Serialize)]
pub struct GateRequest {
    /// The pull request whose authors are checked.
    pub pull_request: PullRequestRef,
    /// The registry to check them against.
    pub registry: RegistryLocation,
    /// Commit count reported alongside the pull request. A listing with
    /// fewer commits fails the evaluation.
    pub expected_commits: Option<u64>,
}

/// The complete record of one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    /// Distinct human authors of the pull request.
    pub authors: AuthorSet,
    /// Signers read from the registry.
    pub signers: SignerRegistry,
    /// Whether the gate passes, and who is missing if not.
    pub outcome: Outcome,
}

/// Evaluate a pull request against the signer registry.
///
/// # Errors
///
/// - [`GateError::Fetch`] if either source fails, or the commit listing
///   holds fewer commits than `expected_commits`
/// - [`GateError::Reconcile`] if a commit has no linked author (raised
///   before the registry is fetched) or the registry document is malformed
///
/// Every error aborts the evaluation; there is no partial result.
pub async fn evaluate<C, R>(
    commits: &C,
    registry: &R,
    request: &GateRequest,
) -> Result<Evaluation, GateError>
where
    C: CommitSource + ?Sized,
    R: RegistrySource + ?Sized,
{
    let records = commits.list_commits(&request.pull_request).await?;
    let listed = records.len() as u64;
    if let Some(expected) = request.expected_commits.filter(|&e| listed < e) {
        return Err(GitHubError::IncompleteCommitList {
            pull_request: request.pull_request.to_string(),
            listed: records.len(),
            expected,
        }
        .into());
    }
    let authors = AuthorSet::from_commits(&records)?;
    info!(
        pull_request = %request.pull_request,
        commits = records.len(),
        authors = %authors,
        "resolved pull request authors"
    );

    let document = registry.fetch_registry(&request.registry).await?;
    let signers = SignerRegistry::from_yaml(&document)?;
    info!(
        registry = %request.registry,
        signers = %signers,
        "loaded signer registry"
    );

    let outcome = Outcome::from_missing(MissingSet::between(&authors, &signers));
    Ok(Evaluation {
        authors,
        signers,
        outcome,
    })
}
