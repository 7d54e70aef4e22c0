//! Contributor-agreement reconciliation for pull requests.
//!
//! `covenant-core` decides which human authors of a change are absent from
//! the signer registry. It performs no I/O: commit authorship and the raw
//! registry document are handed in by the caller.
//!
//! The pipeline has three steps:
//! 1. **Authors**: drop automated accounts, refuse unlinked commits,
//!    deduplicate and sort the rest
//! 2. **Registry**: decode the YAML list of signers
//! 3. **Reconcile**: exact set difference, authors minus signers

pub mod authors;
pub mod error;
pub mod identity;
pub mod reconcile;
pub mod registry;

// Re-export primary types for convenience.
pub use authors::AuthorSet;
pub use error::ReconcileError;
pub use identity::{AccountKind, CommitAuthorship, Identity};
pub use reconcile::{MissingSet, Outcome, reconcile};
pub use registry::SignerRegistry;
