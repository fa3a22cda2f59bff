//! Ownership challenge messages.
//!
//! A challenge is self-describing: `<address>:<unix_seconds>:<tag>`. Nothing
//! is stored when one is issued; the issue time travels inside the message
//! and is checked again when the signed response comes back.

use std::fmt;

use crate::error::{RegistryError, Result};

/// A parsed challenge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub address: String,
    pub issued_at: i64,
    pub tag: String,
}

impl Challenge {
    pub fn new(address: impl Into<String>, issued_at: i64, tag: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            issued_at,
            tag: tag.into(),
        }
    }

    /// Parse a challenge message closed by `tag`.
    ///
    /// The known tag is stripped from the end first, so both the tag and the
    /// address may contain `:`; the timestamp is the last field before it.
    pub fn parse(message: &str, tag: &str) -> Result<Self> {
        let Some(rest) = message
            .strip_suffix(tag)
            .and_then(|rest| rest.strip_suffix(':'))
        else {
            return Err(RegistryError::MalformedChallenge(format!(
                "expected <address>:<seconds>:{tag}, got {message:?}"
            )));
        };
        let Some((address, issued_at)) = rest.rsplit_once(':') else {
            return Err(RegistryError::MalformedChallenge(format!(
                "missing timestamp in {message:?}"
            )));
        };

        let issued_at = issued_at.parse::<i64>().map_err(|e| {
            RegistryError::MalformedChallenge(format!("bad timestamp {issued_at:?}: {e}"))
        })?;

        if address.is_empty() {
            return Err(RegistryError::MalformedChallenge("empty address".into()));
        }

        Ok(Self::new(address, issued_at, tag))
    }

    /// Seconds elapsed between issue time and `now`, or `None` when the
    /// difference does not fit in an `i64`.
    pub fn elapsed(&self, now: i64) -> Option<i64> {
        now.checked_sub(self.issued_at)
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.address, self.issued_at, self.tag)
    }
}
