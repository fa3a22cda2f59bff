//! Canonical CBOR encoding for block digests.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Only integers, byte strings, null and maps (timestamps are i64 seconds)
//!
//! The field keys and the domain prefix are frozen. Any change here
//! invalidates every digest ever sealed.

use ciborium::value::{Integer, Value};

use crate::error::CoreError;
use crate::types::BlockDigest;

/// Domain separation prefix for block digests.
pub const DIGEST_DOMAIN: &[u8] = b"star-registry/block/v1";

/// Block field keys (integer keys for compact encoding).
mod keys {
    pub const POSITION: u64 = 0;
    pub const PREVIOUS_DIGEST: u64 = 1;
    pub const CREATED_AT: u64 = 2;
    pub const PAYLOAD: u64 = 3;
}

/// Encode the sealed fields of a block to canonical CBOR bytes.
///
/// The digest field itself is never part of the encoding.
pub fn canonical_block_bytes(
    position: u64,
    previous_digest: Option<&BlockDigest>,
    created_at: i64,
    payload: &[u8],
) -> Result<Vec<u8>, CoreError> {
    let value = block_to_cbor_value(position, previous_digest, created_at, payload);
    encode_cbor_value_canonical(&value)
}

/// The exact bytes fed to the digest primitive: `DIGEST_DOMAIN || canonical_block_bytes`.
pub fn digest_input(
    position: u64,
    previous_digest: Option<&BlockDigest>,
    created_at: i64,
    payload: &[u8],
) -> Result<Vec<u8>, CoreError> {
    let body = canonical_block_bytes(position, previous_digest, created_at, payload)?;
    let mut buf = Vec::with_capacity(DIGEST_DOMAIN.len() + body.len());
    buf.extend_from_slice(DIGEST_DOMAIN);
    buf.extend_from_slice(&body);
    Ok(buf)
}

fn block_to_cbor_value(
    position: u64,
    previous_digest: Option<&BlockDigest>,
    created_at: i64,
    payload: &[u8],
) -> Value {
    let previous = match previous_digest {
        Some(d) => Value::Bytes(d.0.to_vec()),
        None => Value::Null,
    };

    Value::Map(vec![
        (Value::Integer(keys::POSITION.into()), Value::Integer(position.into())),
        (Value::Integer(keys::PREVIOUS_DIGEST.into()), previous),
        (Value::Integer(keys::CREATED_AT.into()), Value::Integer(created_at.into())),
        (Value::Integer(keys::PAYLOAD.into()), Value::Bytes(payload.to_vec())),
    ])
}

/// Encode a CBOR Value to canonical bytes.
fn encode_cbor_value_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value)?;
    Ok(buf)
}

fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Null => buf.push(0xf6),
        other => {
            return Err(CoreError::EncodingError(format!(
                "unsupported CBOR value in block encoding: {other:?}"
            )))
        }
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
