//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use star_registry_core::{Block, BlockDigest, Keypair, Sha256Hasher};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random BlockDigest.
pub fn block_digest() -> impl Strategy<Value = BlockDigest> {
    any::<[u8; 32]>().prop_map(BlockDigest::from_bytes)
}

/// Generate a timestamp, including pre-epoch values.
pub fn timestamp() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..=4_000_000_000i64
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate star metadata.
///
/// Integers, strings and booleans only; floats do not survive a JSON
/// comparison after a CBOR round-trip in every case.
pub fn star() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 +-]{0,24}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ];
    (
        "[A-Z][a-z]{2,12}",
        "[0-9]{1,2}h [0-9]{1,2}m",
        "[+-][0-9]{1,2}d",
        prop::collection::btree_map("[a-z]{1,8}", leaf, 0..4),
    )
        .prop_map(|(name, ra, dec, extra)| {
            let mut star = json!({ "name": name, "ra": ra, "dec": dec });
            if let Value::Object(map) = &mut star {
                map.extend(extra);
            }
            star
        })
}

/// Parameters for sealing a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub position: u64,
    pub previous_digest: Option<BlockDigest>,
    pub created_at: i64,
    pub payload: Vec<u8>,
}

impl BlockParams {
    /// Seal with SHA-256.
    pub fn seal(&self) -> Block {
        match Block::seal(
            self.position,
            self.previous_digest,
            self.created_at,
            self.payload.clone(),
            &Sha256Hasher,
        ) {
            Ok(block) => block,
            Err(e) => panic!("SHA-256 sealing cannot fail: {e}"),
        }
    }
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            1u64..=u64::MAX,
            block_digest(),
            timestamp(),
            payload(256),
        )
            .prop_map(|(position, previous, created_at, payload)| BlockParams {
                position,
                previous_digest: Some(previous),
                created_at,
                payload,
            })
            .boxed()
    }
}
