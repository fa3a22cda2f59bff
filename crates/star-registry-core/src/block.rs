//! Block: the sealed unit of the ledger.
//!
//! A block is immutable once sealed. Its digest covers the position, the
//! previous digest, the creation time and the payload, and is computed
//! exactly once by [`Block::seal`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::digest_input;
use crate::claim::ClaimPayload;
use crate::crypto::BlockHasher;
use crate::error::CoreError;
use crate::types::BlockDigest;

/// Payload carried by the genesis block.
pub const GENESIS_PAYLOAD: &[u8] = b"Genesis Block";

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 0-based index in the ledger.
    pub position: u64,

    /// Digest of the preceding block (None only for genesis).
    pub previous_digest: Option<BlockDigest>,

    /// Unix seconds, stamped by the ledger at seal time.
    pub created_at: i64,

    /// Encoded claim, or the genesis sentinel.
    pub payload: Bytes,

    /// Digest over the four fields above.
    pub digest: BlockDigest,
}

impl Block {
    /// Seal a new block, computing its digest.
    pub fn seal(
        position: u64,
        previous_digest: Option<BlockDigest>,
        created_at: i64,
        payload: impl Into<Bytes>,
        hasher: &dyn BlockHasher,
    ) -> Result<Self, CoreError> {
        let payload = payload.into();
        let input = digest_input(position, previous_digest.as_ref(), created_at, &payload)?;
        let digest = hasher.digest(&input)?;

        Ok(Self {
            position,
            previous_digest,
            created_at,
            payload,
            digest,
        })
    }

    /// Seal the genesis block.
    pub fn genesis(created_at: i64, hasher: &dyn BlockHasher) -> Result<Self, CoreError> {
        Self::seal(0, None, created_at, GENESIS_PAYLOAD, hasher)
    }

    /// Recompute the digest from the stored fields.
    ///
    /// For an unmodified block this is byte-identical to `self.digest`.
    pub fn recompute_digest(&self, hasher: &dyn BlockHasher) -> Result<BlockDigest, CoreError> {
        let input = digest_input(
            self.position,
            self.previous_digest.as_ref(),
            self.created_at,
            &self.payload,
        )?;
        hasher.digest(&input)
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.position == 0 && self.previous_digest.is_none()
    }

    /// Strictly decode the payload as a claim.
    pub fn decode_claim(&self) -> Result<ClaimPayload, CoreError> {
        ClaimPayload::decode(&self.payload)
    }
}
