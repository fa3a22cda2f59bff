//! Block validation: digest recomputation and predecessor links.

use crate::block::Block;
use crate::crypto::BlockHasher;
use crate::error::ValidationError;

/// Recompute a block's digest and compare it to the stored one.
///
/// A hasher failure is reported as [`ValidationError::Unverifiable`].
pub fn check_digest(block: &Block, hasher: &dyn BlockHasher) -> Result<(), ValidationError> {
    let recomputed = block
        .recompute_digest(hasher)
        .map_err(|e| ValidationError::Unverifiable {
            position: block.position,
            reason: e.to_string(),
        })?;

    if recomputed != block.digest {
        return Err(ValidationError::DigestMismatch {
            position: block.position,
            stored: block.digest,
            recomputed,
        });
    }
    Ok(())
}

/// Check that `block` links to the digest stored in `predecessor`.
pub fn check_link(block: &Block, predecessor: &Block) -> Result<(), ValidationError> {
    if block.previous_digest != Some(predecessor.digest) {
        return Err(ValidationError::BrokenLink {
            position: block.position,
            expected: Some(predecessor.digest),
            found: block.previous_digest,
        });
    }
    Ok(())
}

/// Check the structural shape of the genesis block.
pub fn check_genesis(block: &Block) -> Result<(), ValidationError> {
    if let Some(prev) = block.previous_digest {
        return Err(ValidationError::MalformedGenesis(prev));
    }
    Ok(())
}

/// Validate a single block against its predecessor.
///
/// Pass `None` as the predecessor for the genesis block. Every finding is
/// returned; an empty vector means the block is consistent.
pub fn validate_block(
    block: &Block,
    predecessor: Option<&Block>,
    hasher: &dyn BlockHasher,
) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    if let Err(e) = check_digest(block, hasher) {
        findings.push(e);
    }

    let linked = match predecessor {
        Some(prev) => check_link(block, prev),
        None => check_genesis(block),
    };
    if let Err(e) = linked {
        findings.push(e);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Sha256Hasher;
    use crate::types::BlockDigest;
    use bytes::Bytes;

    fn chain_of_two() -> (Block, Block) {
        let genesis = Block::genesis(100, &Sha256Hasher).unwrap();
        let next = Block::seal(1, Some(genesis.digest), 101, b"x".to_vec(), &Sha256Hasher).unwrap();
        (genesis, next)
    }

    #[test]
    fn test_valid_pair() {
        let (genesis, next) = chain_of_two();
        assert!(validate_block(&genesis, None, &Sha256Hasher).is_empty());
        assert!(validate_block(&next, Some(&genesis), &Sha256Hasher).is_empty());
    }

    #[test]
    fn test_digest_mismatch() {
        let (genesis, mut next) = chain_of_two();
        next.payload = Bytes::from_static(b"y");

        let findings = validate_block(&next, Some(&genesis), &Sha256Hasher);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_digest_mismatch());
        assert_eq!(findings[0].position(), 1);
    }

    #[test]
    fn test_broken_link() {
        let (genesis, _) = chain_of_two();
        let stray = Block::seal(
            1,
            Some(BlockDigest::from_bytes([0x99; 32])),
            101,
            b"x".to_vec(),
            &Sha256Hasher,
        )
        .unwrap();

        let result = check_link(&stray, &genesis);
        assert!(matches!(
            result,
            Err(ValidationError::BrokenLink { position: 1, .. })
        ));
    }

    #[test]
    fn test_missing_link_is_broken() {
        let (genesis, _) = chain_of_two();
        let orphan = Block::seal(1, None, 101, b"x".to_vec(), &Sha256Hasher).unwrap();
        let err = check_link(&orphan, &genesis).unwrap_err();
        assert_eq!(
            err,
            ValidationError::BrokenLink {
                position: 1,
                expected: Some(genesis.digest),
                found: None,
            }
        );
    }

    #[test]
    fn test_genesis_with_link_is_malformed() {
        let bad = Block::seal(
            0,
            Some(BlockDigest::from_bytes([0x01; 32])),
            100,
            b"Genesis Block".to_vec(),
            &Sha256Hasher,
        )
        .unwrap();
        let findings = validate_block(&bad, None, &Sha256Hasher);
        assert_eq!(findings.len(), 1);
        assert!(matches!(findings[0], ValidationError::MalformedGenesis(_)));
    }

    #[test]
    fn test_hasher_failure_is_unverifiable() {
        struct Broken;
        impl BlockHasher for Broken {
            fn digest(&self, _: &[u8]) -> Result<BlockDigest, crate::error::CoreError> {
                Err(crate::error::CoreError::HashingFailure("down".into()))
            }
        }

        let (genesis, _) = chain_of_two();
        let result = check_digest(&genesis, &Broken);
        assert!(matches!(
            result,
            Err(ValidationError::Unverifiable { position: 0, .. })
        ));
    }
}
