//! Error types for the registry.

use star_registry_core::CoreError;
use star_registry_ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Audit findings are not errors; they are returned in an
/// [`AuditReport`](crate::audit::AuditReport).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Lookup target absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A block payload does not decode as a claim.
    #[error("malformed payload at position {position}: {reason}")]
    MalformedPayload { position: u64, reason: String },

    /// The challenge window has elapsed. Request a new challenge.
    #[error("challenge expired: {elapsed}s elapsed, window is {window}s")]
    ChallengeExpired { elapsed: i64, window: u64 },

    /// The message is not a challenge issued for this address.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// Signature verification failed or the signature could not be parsed.
    #[error("invalid signature")]
    InvalidSignature,

    /// The digest primitive failed. The ledger is unchanged.
    #[error("hashing failure: {0}")]
    HashingFailure(String),

    /// The claim could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),

    /// A decode or audit task did not complete.
    #[error("task failed: {0}")]
    TaskFailed(String),
}

impl From<LedgerError> for RegistryError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Seal(CoreError::HashingFailure(msg)) => RegistryError::HashingFailure(msg),
            LedgerError::Seal(CoreError::EncodingError(msg)) => RegistryError::Encoding(msg),
            other => RegistryError::Ledger(other),
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
