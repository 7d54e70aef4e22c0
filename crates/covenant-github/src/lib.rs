//! GitHub collaborators for the covenant contributor-agreement gate.
//!
//! `covenant-github` supplies what `covenant-core` deliberately leaves out:
//! reading the Actions event payload, listing a pull request's commits,
//! retrieving the signer registry from the upstream repository, and the
//! [`gate::evaluate`] orchestrator that ties them to the reconciler.
//!
//! Transport is hidden behind the [`CommitSource`] and [`RegistrySource`]
//! traits so the orchestrator can run against [`testing::FakeGitHub`].

pub mod client;
pub mod content;
pub mod error;
pub mod event;
pub mod gate;
pub mod repo;
pub mod source;
pub mod testing;
pub mod types;

// Re-export primary types for convenience.
pub use client::GitHubClient;
pub use error::{GateError, GitHubError};
pub use event::PullRequestEvent;
pub use gate::{Evaluation, GateRequest, evaluate};
pub use repo::{PullRequestRef, RegistryLocation, RepoRef};
pub use source::{CommitSource, RegistrySource};
