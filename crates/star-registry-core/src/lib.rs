//! # Star Registry Core
//!
//! Pure primitives for the star registry ledger: blocks, digests, claim
//! payloads, and signature verification.
//!
//! This crate contains no I/O and no locking. It is pure computation over
//! the data structures the ledger is built from.
//!
//! ## Key Types
//!
//! - [`Block`] - A sealed, immutable ledger entry
//! - [`BlockDigest`] - Content-address of a block (SHA-256)
//! - [`ClaimPayload`] - The decoded ownership claim carried by a block
//! - [`BlockHasher`] / [`SignatureVerifier`] - The two external primitives
//!
//! ## Canonicalization
//!
//! Block digests are computed over deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod claim;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use block::{Block, GENESIS_PAYLOAD};
pub use canonical::{canonical_block_bytes, digest_input, DIGEST_DOMAIN};
pub use claim::{ClaimPayload, StarRecord};
pub use clock::{Clock, SystemClock};
pub use crypto::{BlockHasher, Ed25519Verifier, Keypair, Sha256Hasher, SignatureVerifier};
pub use error::{CoreError, ValidationError};
pub use types::BlockDigest;
pub use validation::{check_digest, check_genesis, check_link, validate_block};
