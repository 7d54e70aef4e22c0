//! Account identities and per-commit authorship records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// A platform account name, e.g. a GitHub login.
///
/// Comparison is exact and case-sensitive; no normalization is applied.
/// The only structural rule is that an identity is never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from an account name.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::EmptyIdentity`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ReconcileError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ReconcileError::EmptyIdentity);
        }
        Ok(Self(name))
    }

    /// The account name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The account name as an at-sign mention, e.g. `@alice`.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("@{}", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ReconcileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identity {
    type Error = ReconcileError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Whether an account is operated by a person or by automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// A person; must have signed the agreement.
    #[default]
    Human,
    /// A bot or app account; never required to sign.
    Automated,
}

impl AccountKind {
    /// Classify a platform account-type tag.
    ///
    /// `bot` (any case) is automated. Every other tag, including `User`
    /// and `Organization`, is treated as human.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("bot") {
            Self::Automated
        } else {
            Self::Human
        }
    }
}

/// Authorship of a single commit in a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthorship {
    /// Commit SHA, carried for diagnostics.
    pub sha: String,
    /// The linked account, or `None` when the commit's author email is not
    /// associated with any account.
    pub author: Option<Identity>,
    /// Account kind of the author.
    pub kind: AccountKind,
}

impl CommitAuthorship {
    /// A commit by a linked human account.
    #[must_use]
    pub fn human(sha: impl Into<String>, author: Identity) -> Self {
        Self {
            sha: sha.into(),
            author: Some(author),
            kind: AccountKind::Human,
        }
    }

    /// A commit by a linked automated account.
    #[must_use]
    pub fn automated(sha: impl Into<String>, author: Identity) -> Self {
        Self {
            sha: sha.into(),
            author: Some(author),
            kind: AccountKind::Automated,
        }
    }

    /// A commit whose author is not linked to any account.
    #[must_use]
    pub fn unlinked(sha: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            author: None,
            kind: AccountKind::Human,
        }
    }
}
