//! Error types for the star registry core.

use thiserror::Error;

use crate::types::BlockDigest;

/// Core errors that can occur while sealing, decoding or verifying.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed signature encoding: {0}")]
    MalformedSignature(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("hashing failure: {0}")]
    HashingFailure(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Integrity findings for a single block.
///
/// These are returned as values from audits, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("digest mismatch at position {position}: stored {stored}, recomputed {recomputed}")]
    DigestMismatch {
        position: u64,
        stored: BlockDigest,
        recomputed: BlockDigest,
    },

    #[error("broken link at position {position}: expected {expected:?}, found {found:?}")]
    BrokenLink {
        position: u64,
        expected: Option<BlockDigest>,
        found: Option<BlockDigest>,
    },

    #[error("genesis block carries a previous digest {0}")]
    MalformedGenesis(BlockDigest),

    #[error("block at position {position} could not be verified: {reason}")]
    Unverifiable { position: u64, reason: String },
}

impl ValidationError {
    /// The ledger position this finding refers to.
    pub fn position(&self) -> u64 {
        match self {
            ValidationError::DigestMismatch { position, .. }
            | ValidationError::BrokenLink { position, .. }
            | ValidationError::Unverifiable { position, .. } => *position,
            ValidationError::MalformedGenesis(_) => 0,
        }
    }

    /// Whether this is a digest recomputation mismatch.
    pub fn is_digest_mismatch(&self) -> bool {
        matches!(self, ValidationError::DigestMismatch { .. })
    }

    /// Whether this is a broken predecessor link.
    pub fn is_broken_link(&self) -> bool {
        matches!(self, ValidationError::BrokenLink { .. })
    }
}
