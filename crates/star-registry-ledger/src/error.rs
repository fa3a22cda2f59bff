//! Error types for the ledger.

use star_registry_core::CoreError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Sealing failed (the digest primitive errored). The ledger is unchanged.
    #[error("failed to seal block: {0}")]
    Seal(#[from] CoreError),

    /// A restored sequence is not indexed `0..n`.
    #[error("block at index {index} has position {position}")]
    NonContiguous { index: usize, position: u64 },
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
