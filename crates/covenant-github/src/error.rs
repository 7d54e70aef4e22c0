//! Error types for the GitHub collaborators.

use std::path::PathBuf;

use covenant_core::ReconcileError;

/// Errors from reading the event context or talking to the GitHub API.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// The triggering event carries no pull request.
    #[error("No pull request context available")]
    NoPullRequestContext,

    /// The event payload file could not be read.
    #[error("failed to read event payload `{path}`: {source}")]
    EventIo {
        /// Path of the payload file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The event payload is not valid JSON or lacks required fields.
    #[error("invalid event payload: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// A repository reference is not of the form `owner/name`.
    #[error("invalid repository `{0}`: expected `owner/name`")]
    InvalidRepository(String),

    /// The API base URL cannot be used to build endpoint URLs.
    #[error("invalid GitHub API URL `{0}`")]
    InvalidApiUrl(String),

    /// The token contains characters not allowed in an HTTP header.
    #[error("GitHub token is not a valid header value")]
    InvalidToken,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("GitHub API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API request to {url} failed with status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// The API's error message, or the status text.
        message: String,
    },

    /// The commit listing is shorter than the pull request's commit count.
    /// The listing endpoint stops at 250 commits.
    #[error(
        "listed {listed} of {expected} commits of {pull_request}; \
         pull requests with more than 250 commits cannot be checked"
    )]
    IncompleteCommitList {
        /// The pull request, `owner/name#number`.
        pull_request: String,
        /// Commits returned by the listing.
        listed: usize,
        /// Commits reported by the event payload.
        expected: u64,
    },

    /// The registry path names a directory, symlink or submodule.
    #[error("`{path}` is not a regular file")]
    NotAFile {
        /// Repository path that was requested.
        path: String,
    },

    /// The file content is not delivered inline as base64.
    #[error("`{path}` has unsupported content encoding `{encoding}`")]
    UnsupportedEncoding {
        /// Repository path that was requested.
        path: String,
        /// Encoding reported by the API.
        encoding: String,
    },

    /// The inline file content is not valid base64.
    #[error("file content is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Errors that abort a gate evaluation.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Fetching commits or the registry failed.
    #[error(transparent)]
    Fetch(#[from] GitHubError),

    /// Authorship could not be attributed or the registry is malformed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}
