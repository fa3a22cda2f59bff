//! Golden test vectors for block digests.
//!
//! Each vector fixes the sealed fields of a block and the SHA-256 digest of
//! `star-registry/block/v1 || canonical CBOR`. A change to the canonical
//! encoding, the field keys or the domain prefix breaks these.

use star_registry_core::{Block, BlockDigest};

use crate::generators::BlockParams;

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub position: u64,
    /// Hex of the previous digest, if any.
    pub previous_digest: Option<&'static str>,
    pub created_at: i64,
    pub payload: &'static [u8],
    /// Expected digest (hex).
    pub expected_digest: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis at the epoch",
            position: 0,
            previous_digest: None,
            created_at: 0,
            payload: b"Genesis Block",
            expected_digest: "b312090d3c9cedbca0821184be9e18dd104e93e2da08cec4cde89017028e763f",
        },
        GoldenVector {
            name: "genesis at 2023-11-14T22:13:20Z",
            position: 0,
            previous_digest: None,
            created_at: 1_700_000_000,
            payload: b"Genesis Block",
            expected_digest: "7f1ee246087cb01cc1fa20e3dbda71b955211711ee356b14c49d6d38a54ee341",
        },
        GoldenVector {
            name: "first block after genesis",
            position: 1,
            previous_digest: Some(
                "7f1ee246087cb01cc1fa20e3dbda71b955211711ee356b14c49d6d38a54ee341",
            ),
            created_at: 1_700_000_001,
            payload: b"hello",
            expected_digest: "6e2f2b59a9d4162f8d6cb7cdb334dbffa9db07fe98d7556b3e462b1614b4d170",
        },
        GoldenVector {
            name: "negative timestamp, empty payload",
            position: 7,
            previous_digest: Some(
                "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            ),
            created_at: -1,
            payload: b"",
            expected_digest: "070745f17f8d645e1e4e2bd533dd811d95613c6225a581f5bd4cfe10652080e3",
        },
    ]
}

/// Seal the block a vector describes.
pub fn block_from_vector(vector: &GoldenVector) -> Block {
    let previous_digest = vector.previous_digest.map(|hex| match BlockDigest::from_hex(hex) {
        Ok(d) => d,
        Err(e) => panic!("vector {:?} has a bad previous digest: {e}", vector.name),
    });
    BlockParams {
        position: vector.position,
        previous_digest,
        created_at: vector.created_at,
        payload: vector.payload.to_vec(),
    }
    .seal()
}

/// Seal every vector and compare against its expected digest.
///
/// Returns `(name, matches, computed_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let hex = block_from_vector(v).digest.to_hex();
            let ok = hex == v.expected_digest;
            (v.name.to_string(), ok, hex)
        })
        .collect()
}
