//! The signer registry: identities that have signed the agreement.
//!
//! The registry file is owned by the repository maintainers, not by this
//! crate. Its format is a YAML sequence of account names:
//!
//! ```yaml
//! - alice
//! - bob
//! ```
//!
//! An empty file, a file holding only comments, or an explicit `null`
//! decodes to an empty registry.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::ReconcileError;
use crate::identity::Identity;

/// Set of identities that have signed the contributor agreement.
///
/// Equality compares signers only; duplicate bookkeeping is ignored.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SignerRegistry {
    signers: BTreeSet<Identity>,
    #[serde(skip)]
    duplicates: Vec<Identity>,
}

impl SignerRegistry {
    /// Decode a registry from the raw bytes of a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRegistry`] if the bytes are not
    /// UTF-8 or the document is not a sequence of strings, and
    /// [`ReconcileError::EmptyRegistryEntry`] if any entry is empty.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, ReconcileError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ReconcileError::InvalidRegistry(format!("not UTF-8: {e}")))?;

        if is_blank_document(text) {
            return Ok(Self::default());
        }

        let entries: Option<Vec<String>> = serde_yaml::from_str(text)?;
        let mut registry = Self::default();
        for (index, entry) in entries.unwrap_or_default().into_iter().enumerate() {
            let identity = Identity::new(entry)
                .map_err(|_| ReconcileError::EmptyRegistryEntry { index })?;
            registry.insert(identity);
        }
        Ok(registry)
    }

    /// Add a signer. Returns `false` if it was already present.
    pub fn insert(&mut self, identity: Identity) -> bool {
        if self.signers.contains(&identity) {
            self.duplicates.push(identity);
            false
        } else {
            self.signers.insert(identity);
            true
        }
    }

    /// Whether `identity` has signed. Exact, case-sensitive match.
    #[must_use]
    pub fn contains(&self, identity: &Identity) -> bool {
        self.signers.contains(identity)
    }

    /// Signers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.signers.iter()
    }

    /// Number of distinct signers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether nobody has signed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Entries that repeated an earlier entry, in document order.
    ///
    /// Duplicates are harmless for reconciliation; they are reported so
    /// maintainers can keep the file tidy.
    #[must_use]
    pub fn duplicates(&self) -> &[Identity] {
        &self.duplicates
    }

    /// Render the registry as a sorted YAML sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidRegistry`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ReconcileError> {
        let names: Vec<&str> = self.signers.iter().map(Identity::as_str).collect();
        Ok(serde_yaml::to_string(&names)?)
    }
}

impl PartialEq for SignerRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.signers == other.signers
    }
}

impl Eq for SignerRegistry {}

impl FromIterator<Identity> for SignerRegistry {
    fn from_iter<I: IntoIterator<Item = Identity>>(iter: I) -> Self {
        let mut registry = Self::default();
        for identity in iter {
            registry.insert(identity);
        }
        registry
    }
}

impl fmt::Display for SignerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.signers.iter().map(Identity::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// True when the document has no content besides blank lines, comments
/// and document markers.
fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
