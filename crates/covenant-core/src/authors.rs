//! Extraction of the human author set from pull-request commits.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::ReconcileError;
use crate::identity::{AccountKind, CommitAuthorship, Identity};

/// Distinct human authors of a pull request, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorSet(Vec<Identity>);

impl AuthorSet {
    /// Build the author set from commit authorship records.
    ///
    /// Every record must carry an identity. Automated accounts are dropped;
    /// the remaining identities are deduplicated and sorted by their string
    /// value. An empty `commits` slice yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::UnlinkedAuthor`] listing every commit
    /// without an identity. A single unlinked commit fails the whole set.
    pub fn from_commits(commits: &[CommitAuthorship]) -> Result<Self, ReconcileError> {
        let unlinked: Vec<String> = commits
            .iter()
            .filter(|c| c.author.is_none())
            .map(|c| c.sha.clone())
            .collect();
        if !unlinked.is_empty() {
            return Err(ReconcileError::UnlinkedAuthor { commits: unlinked });
        }

        let authors: BTreeSet<&Identity> = commits
            .iter()
            .filter(|c| c.kind != AccountKind::Automated)
            .filter_map(|c| c.author.as_ref())
            .collect();

        Ok(Self(authors.into_iter().cloned().collect()))
    }

    /// Authors in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[Identity] {
        &self.0
    }

    /// Iterate over authors in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.0.iter()
    }

    /// Number of distinct human authors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the pull request has no human authors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AuthorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Identity::as_str).collect();
        f.write_str(&names.join(","))
    }
}
