//! The Registry: challenge/response ownership claims over the ledger.
//!
//! Brings together the ledger, the signature primitive and the clock into
//! the caller-facing API. Queries live in [`crate::query`], audits in
//! [`crate::audit`].

use std::sync::Arc;

use star_registry_core::{
    Block, ClaimPayload, Clock, Ed25519Verifier, Sha256Hasher, SignatureVerifier, SystemClock,
};
use star_registry_ledger::Ledger;

use crate::challenge::Challenge;
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};

/// The star registry.
///
/// Provides:
/// - Issuing ownership challenges
/// - Accepting signed claims and recording them on the ledger
/// - Lookups by digest, position and address
/// - Integrity audits
pub struct Registry<V: SignatureVerifier = Ed25519Verifier> {
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) verifier: V,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: RegistryConfig,
}

impl Registry<Ed25519Verifier> {
    /// Create a registry with SHA-256 sealing, Ed25519 addresses and the
    /// system clock. The genesis block is sealed before this returns.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let ledger = Ledger::new(Arc::new(Sha256Hasher), Arc::new(SystemClock))?;
        Ok(Self::with_parts(Arc::new(ledger), Ed25519Verifier, config))
    }
}

impl<V: SignatureVerifier> Registry<V> {
    /// Create a registry over an existing ledger.
    ///
    /// The registry reads time from the ledger's clock so challenge checks
    /// and block timestamps agree.
    pub fn with_parts(ledger: Arc<Ledger>, verifier: V, config: RegistryConfig) -> Self {
        let clock = ledger.clock();
        Self {
            ledger,
            verifier,
            clock,
            config,
        }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// The configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Current ledger height.
    pub async fn height(&self) -> i64 {
        self.ledger.height().await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ownership Challenge Protocol
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a challenge message for `address` to sign.
    ///
    /// Nothing is persisted; the message carries its own issue time.
    pub async fn issue_challenge(&self, address: &str) -> String {
        let challenge = Challenge::new(address, self.clock.now_secs(), &self.config.protocol_tag);
        tracing::debug!(address, issued_at = challenge.issued_at, "issued challenge");
        challenge.to_string()
    }

    /// Accept a signed claim and record it on the ledger.
    ///
    /// Fails with `ChallengeExpired` once the window has elapsed and with
    /// `InvalidSignature` when verification fails or the signature cannot be
    /// parsed. No block is appended on any failure.
    pub async fn accept_claim(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: serde_json::Value,
    ) -> Result<Arc<Block>> {
        self.check_challenge(address, message)?;

        match self.verifier.verify(message, address, signature).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(address, "rejected claim: signature does not verify");
                return Err(RegistryError::InvalidSignature);
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "rejected claim: malformed signature input");
                return Err(RegistryError::InvalidSignature);
            }
        }

        let payload = ClaimPayload::new(address, message, signature, star)
            .encode()
            .map_err(|e| RegistryError::Encoding(e.to_string()))?;

        let block = self.ledger.append(payload).await?;
        tracing::info!(
            address,
            position = block.position,
            digest = %block.digest,
            "recorded claim"
        );
        Ok(block)
    }

    /// Check that `message` is an unexpired challenge issued for `address`.
    fn check_challenge(&self, address: &str, message: &str) -> Result<Challenge> {
        let challenge = Challenge::parse(message, &self.config.protocol_tag)?;

        if challenge.address != address {
            return Err(RegistryError::MalformedChallenge(format!(
                "challenge was issued for {:?}",
                challenge.address
            )));
        }

        let Some(elapsed) = challenge.elapsed(self.clock.now_secs()) else {
            return Err(RegistryError::MalformedChallenge(format!(
                "timestamp {} is out of range",
                challenge.issued_at
            )));
        };
        if elapsed < 0 {
            return Err(RegistryError::MalformedChallenge(
                "challenge issued in the future".into(),
            ));
        }

        let window = self.config.window_secs();
        if elapsed as u64 >= window {
            tracing::warn!(address, elapsed, window, "rejected claim: challenge expired");
            return Err(RegistryError::ChallengeExpired { elapsed, window });
        }

        Ok(challenge)
    }
}
