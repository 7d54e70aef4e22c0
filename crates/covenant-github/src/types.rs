//! GitHub REST API response shapes, reduced to the fields the gate reads.

use covenant_core::{AccountKind, CommitAuthorship, Identity};
use serde::Deserialize;

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/commits`.
#[derive(Debug, Deserialize)]
pub struct PullCommit {
    /// Commit SHA.
    pub sha: String,
    /// The account GitHub linked to the commit's author email, if any.
    pub author: Option<Account>,
}

/// A GitHub account as embedded in API responses.
#[derive(Debug, Deserialize)]
pub struct Account {
    /// Login name.
    #[serde(default)]
    pub login: String,
    /// Account type tag: `User`, `Bot`, `Organization`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl PullCommit {
    /// Convert to a domain authorship record.
    ///
    /// A `null` author or an empty login both mean the commit could not be
    /// attributed to an account.
    #[must_use]
    pub fn into_authorship(self) -> CommitAuthorship {
        let (author, kind) = match self.author {
            Some(account) => (
                Identity::new(account.login).ok(),
                AccountKind::from_type_tag(&account.kind),
            ),
            None => (None, AccountKind::Human),
        };
        CommitAuthorship {
            sha: self.sha,
            author,
            kind,
        }
    }
}

/// Response of `GET /repos/{owner}/{repo}/contents/{path}`.
///
/// A file, symlink or submodule yields a single object; a directory yields
/// an array of entries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentResponse {
    /// A single repository entry.
    Entry(ContentEntry),
    /// A directory listing.
    Listing(Vec<serde_json::Value>),
}

/// A single entry from the contents API.
#[derive(Debug, Deserialize)]
pub struct ContentEntry {
    /// Entry type: `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Path within the repository.
    pub path: String,
    /// Content encoding; `base64` for files up to 1 MB, `none` above.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Encoded content, wrapped at 60 columns.
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,
}
