//! Cryptographic primitives for the star registry.
//!
//! The ledger consumes two opaque primitives: a digest function for sealing
//! blocks and an address-based signature check for ownership claims. Both sit
//! behind traits so the registry can be driven by other implementations.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::CoreError;
use crate::types::BlockDigest;

/// The digest primitive used to seal and audit blocks.
///
/// Implementations must be pure and deterministic: the same bytes always
/// produce the same digest.
pub trait BlockHasher: Send + Sync {
    /// Hash the given bytes.
    fn digest(&self, data: &[u8]) -> Result<BlockDigest, CoreError>;
}

/// SHA-256 block hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> BlockDigest {
        let mut hasher = Sha256::new();
        hasher.update(data);
        BlockDigest(hasher.finalize().into())
    }
}

impl BlockHasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> Result<BlockDigest, CoreError> {
        Ok(Self::hash(data))
    }
}

/// The signature verification primitive.
///
/// Returns `Ok(true)` only for a valid signature by `address` over `message`.
/// Malformed input is reported as an error; callers must treat any error as
/// an invalid signature.
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    async fn verify(&self, message: &str, address: &str, signature: &str)
        -> Result<bool, CoreError>;
}

/// Ed25519 verifier.
///
/// An address is the lowercase hex of a 32-byte Ed25519 public key, and a
/// signature is the hex of the 64-byte signature over the message bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    /// Parse an address into a verifying key.
    pub fn parse_address(address: &str) -> Result<VerifyingKey, CoreError> {
        let bytes = hex::decode(address).map_err(|_| CoreError::InvalidPublicKey)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&arr).map_err(|_| CoreError::InvalidPublicKey)
    }

    /// Parse a hex signature.
    pub fn parse_signature(signature: &str) -> Result<Signature, CoreError> {
        let bytes =
            hex::decode(signature).map_err(|e| CoreError::MalformedSignature(e.to_string()))?;
        let arr: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::MalformedSignature(format!("expected 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Signature::from_bytes(&arr))
    }

    /// Synchronous verification used by the async trait impl.
    pub fn verify_sync(message: &str, address: &str, signature: &str) -> Result<bool, CoreError> {
        let key = Self::parse_address(address)?;
        let sig = Self::parse_signature(signature)?;
        Ok(key.verify(message.as_bytes(), &sig).is_ok())
    }
}

#[async_trait]
impl SignatureVerifier for Ed25519Verifier {
    async fn verify(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, CoreError> {
        Self::verify_sync(message, address, signature)
    }
}

/// A keypair whose public key is a registry address.
///
/// This wraps ed25519-dalek's SigningKey.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The registry address: hex of the public key.
    pub fn address(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge message, returning the hex signature.
    pub fn sign_message(&self, message: &str) -> String {
        let sig = self.signing_key.sign(message.as_bytes());
        hex::encode(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({}...)", &self.address()[..16])
    }
}
