//! Set difference between pull-request authors and the signer registry.

use serde::Serialize;

use crate::authors::AuthorSet;
use crate::error::ReconcileError;
use crate::identity::{CommitAuthorship, Identity};
use crate::registry::SignerRegistry;

/// Authors that are absent from the registry, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingSet(Vec<Identity>);

impl MissingSet {
    /// Compute `authors \ registry` with exact string equality.
    #[must_use]
    pub fn between(authors: &AuthorSet, registry: &SignerRegistry) -> Self {
        Self(
            authors
                .iter()
                .filter(|author| !registry.contains(author))
                .cloned()
                .collect(),
        )
    }

    /// Missing identities in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[Identity] {
        &self.0
    }

    /// Whether every author has signed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain names joined with `", "`, e.g. `alice, bob`.
    #[must_use]
    pub fn names(&self) -> String {
        self.0
            .iter()
            .map(Identity::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Mentions joined with `", "`, e.g. `@alice, @bob`.
    #[must_use]
    pub fn mentions(&self) -> String {
        self.0
            .iter()
            .map(Identity::mention)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of reconciling a pull request against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "missing", rename_all = "lowercase")]
pub enum Outcome {
    /// Every human author has signed.
    Satisfied,
    /// Some human authors have not signed.
    Unsatisfied(MissingSet),
}

impl Outcome {
    /// Build the outcome from a computed missing set.
    #[must_use]
    pub fn from_missing(missing: MissingSet) -> Self {
        if missing.is_empty() {
            Self::Satisfied
        } else {
            Self::Unsatisfied(missing)
        }
    }

    /// Whether the gate passes.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied)
    }

    /// The missing signers; empty when satisfied.
    #[must_use]
    pub fn missing(&self) -> &[Identity] {
        match self {
            Self::Satisfied => &[],
            Self::Unsatisfied(missing) => missing.as_slice(),
        }
    }
}

/// Determine which human commit authors have not signed.
///
/// Pure and deterministic: the output depends only on the set of
/// `(identity, kind)` pairs in `commits` and on `registry`, never on
/// commit order. Empty inputs are valid; no commits is vacuously
/// satisfied.
///
/// # Errors
///
/// Returns [`ReconcileError::UnlinkedAuthor`] if any commit has no
/// identity. No partial result is produced in that case.
pub fn reconcile(
    commits: &[CommitAuthorship],
    registry: &SignerRegistry,
) -> Result<Outcome, ReconcileError> {
    let authors = AuthorSet::from_commits(commits)?;
    Ok(Outcome::from_missing(MissingSet::between(&authors, registry)))
}
