//! Error types for the reconciliation subsystem.

/// Errors from building author sets, decoding registries, or reconciling.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// One or more commits have no platform account attached.
    #[error(
        "pull request contains commits without associated GitHub users: {}",
        commits.join(", ")
    )]
    UnlinkedAuthor {
        /// SHAs of the commits whose author could not be attributed.
        commits: Vec<String>,
    },

    /// An identity was constructed from an empty string.
    #[error("identity must not be empty")]
    EmptyIdentity,

    /// The registry document is not a YAML list of strings.
    #[error("invalid signer registry: {0}")]
    InvalidRegistry(String),

    /// The registry document lists an empty identity.
    #[error("invalid signer registry: entry {index} is empty")]
    EmptyRegistryEntry {
        /// Zero-based position of the entry in the document.
        index: usize,
    },
}

impl From<serde_yaml::Error> for ReconcileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::InvalidRegistry(err.to_string())
    }
}
