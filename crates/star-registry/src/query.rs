//! Registry query layer: lookups by digest, position and claimant address.

use std::sync::Arc;

use tokio::task::JoinSet;

use star_registry_core::{Block, BlockDigest, ClaimPayload, SignatureVerifier, StarRecord};

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// A block whose payload could not be decoded during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub position: u64,
    pub reason: String,
}

/// Result of scanning the ledger for one address.
#[derive(Debug, Clone, Default)]
pub struct AddressScan {
    /// Matching stars, in ascending position order.
    pub records: Vec<StarRecord>,
    /// Blocks that did not decode, in ascending position order.
    pub skipped: Vec<SkippedEntry>,
}

impl<V: SignatureVerifier> Registry<V> {
    /// Get a block by digest.
    pub async fn find_by_digest(&self, digest: &BlockDigest) -> Result<Arc<Block>> {
        self.ledger
            .get_by_digest(digest)
            .await
            .ok_or_else(|| RegistryError::NotFound(format!("block with digest {}", digest.to_hex())))
    }

    /// Get a block by hex-encoded digest. Unparseable input is `NotFound`.
    pub async fn find_by_hex_digest(&self, digest: &str) -> Result<Arc<Block>> {
        let digest = BlockDigest::from_hex(digest)
            .map_err(|_| RegistryError::NotFound(format!("block with digest {digest:?}")))?;
        self.find_by_digest(&digest).await
    }

    /// Get a block by position. Genesis is position 0.
    pub async fn find_by_position(&self, position: u64) -> Result<Arc<Block>> {
        self.ledger
            .get_by_position(position)
            .await
            .ok_or_else(|| RegistryError::NotFound(format!("block at position {position}")))
    }

    /// Blocks with `start <= position <= end`.
    pub async fn blocks(&self, start: u64, end: u64) -> Vec<Arc<Block>> {
        self.ledger.range(start, end).await
    }

    /// Strictly decode the claim carried by one block.
    pub async fn decode_claim(&self, position: u64) -> Result<ClaimPayload> {
        let block = self.find_by_position(position).await?;
        block
            .decode_claim()
            .map_err(|e| RegistryError::MalformedPayload {
                position,
                reason: e.to_string(),
            })
    }

    /// Stars claimed by `address`, in ascending position order.
    ///
    /// Blocks that fail to decode are skipped and logged.
    pub async fn find_by_address(&self, address: &str) -> Result<Vec<StarRecord>> {
        Ok(self.scan_address(address).await?.records)
    }

    /// Scan every claim block for `address`.
    ///
    /// Works on a snapshot taken at call time, decodes each block in its own
    /// task, and returns only after every task has finished.
    pub async fn scan_address(&self, address: &str) -> Result<AddressScan> {
        let snapshot = self.ledger.snapshot().await;

        let mut tasks = JoinSet::new();
        for block in snapshot.into_iter().skip(1) {
            tasks.spawn(async move { (block.position, block.decode_claim()) });
        }

        let mut found = Vec::new();
        let mut skipped = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (position, decoded) = joined.map_err(|e| RegistryError::TaskFailed(e.to_string()))?;
            match decoded {
                Ok(claim) if claim.address == address => found.push((position, claim.into_record())),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping undecodable payload");
                    skipped.push(SkippedEntry {
                        position,
                        reason: e.to_string(),
                    });
                }
            }
        }

        found.sort_by_key(|(position, _)| *position);
        skipped.sort_by_key(|entry| entry.position);

        Ok(AddressScan {
            records: found.into_iter().map(|(_, record)| record).collect(),
            skipped,
        })
    }
}
