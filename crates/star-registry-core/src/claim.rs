//! Claim payload codec.
//!
//! Every non-genesis block carries one encoded claim: the claimant's address,
//! the exact challenge message they signed, the signature, and the star
//! metadata supplied by the caller. The star is never inspected.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The decoded body of a non-genesis block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimPayload {
    /// The claimant's public identity.
    pub address: String,
    /// The challenge message that was signed.
    pub message: String,
    /// The signature over `message`.
    pub signature: String,
    /// Opaque caller metadata.
    pub star: serde_json::Value,
}

impl ClaimPayload {
    pub fn new(
        address: impl Into<String>,
        message: impl Into<String>,
        signature: impl Into<String>,
        star: serde_json::Value,
    ) -> Self {
        Self {
            address: address.into(),
            message: message.into(),
            signature: signature.into(),
            star,
        }
    }

    /// Encode to CBOR bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Decode from CBOR bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::MalformedPayload(e.to_string()))
    }

    /// The public projection of this claim.
    pub fn into_record(self) -> StarRecord {
        StarRecord {
            address: self.address,
            star: self.star,
        }
    }
}

/// A star as returned by address lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub address: String,
    pub star: serde_json::Value,
}
