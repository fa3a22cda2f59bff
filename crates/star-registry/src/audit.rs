//! Integrity auditor: walks the ledger and reports every inconsistency.

use std::sync::Arc;

use tokio::task::JoinSet;

use star_registry_core::{
    check_digest, check_genesis, check_link, validate_block, SignatureVerifier, ValidationError,
};

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

/// The complete result of an audit.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Ledger height at the time of the snapshot.
    pub height: i64,
    /// Every finding, ordered by position.
    pub findings: Vec<ValidationError>,
}

impl AuditReport {
    /// No findings. This says the ledger is internally consistent, not that
    /// it matches any external record.
    pub fn is_consistent(&self) -> bool {
        self.findings.is_empty()
    }

    /// Positions with a digest mismatch.
    pub fn digest_mismatches(&self) -> Vec<u64> {
        self.findings
            .iter()
            .filter(|f| f.is_digest_mismatch())
            .map(ValidationError::position)
            .collect()
    }

    /// Positions with a broken predecessor link.
    pub fn broken_links(&self) -> Vec<u64> {
        self.findings
            .iter()
            .filter(|f| f.is_broken_link())
            .map(ValidationError::position)
            .collect()
    }
}

/// Sort key within one position: structural findings after digest ones.
fn finding_rank(finding: &ValidationError) -> u8 {
    match finding {
        ValidationError::DigestMismatch { .. } => 0,
        ValidationError::Unverifiable { .. } => 1,
        ValidationError::MalformedGenesis(_) => 2,
        ValidationError::BrokenLink { .. } => 3,
    }
}

impl<V: SignatureVerifier> Registry<V> {
    /// Audit the whole ledger.
    ///
    /// Every digest recomputation runs as its own blocking task and all of
    /// them are joined before the report is returned. Links are checked for
    /// positions `1..=height`; genesis is the trusted root.
    pub async fn audit(&self) -> Result<AuditReport> {
        let snapshot = self.ledger.snapshot().await;
        let height = snapshot.len() as i64 - 1;
        let hasher = self.ledger.hasher();

        let mut tasks = JoinSet::new();
        for block in &snapshot {
            if block.position == 0 && !self.config.audit_genesis_digest {
                continue;
            }
            let block = Arc::clone(block);
            let hasher = Arc::clone(&hasher);
            tasks.spawn_blocking(move || check_digest(&block, hasher.as_ref()).err());
        }

        let mut findings = Vec::new();
        if let Some(genesis) = snapshot.first() {
            if let Err(e) = check_genesis(genesis) {
                findings.push(e);
            }
        }
        for pair in snapshot.windows(2) {
            if let Err(e) = check_link(&pair[1], &pair[0]) {
                findings.push(e);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            let finding = joined.map_err(|e| RegistryError::TaskFailed(e.to_string()))?;
            findings.extend(finding);
        }

        findings.sort_by_key(|f| (f.position(), finding_rank(f)));
        for finding in &findings {
            tracing::warn!(position = finding.position(), %finding, "audit finding");
        }
        tracing::debug!(height, findings = findings.len(), "audit complete");

        Ok(AuditReport { height, findings })
    }

    /// Validate one block against its predecessor.
    pub async fn validate_block(&self, position: u64) -> Result<Vec<ValidationError>> {
        let block = self.find_by_position(position).await?;
        let predecessor = match position.checked_sub(1) {
            Some(prev) => Some(self.find_by_position(prev).await?),
            None => None,
        };
        let hasher = self.ledger.hasher();
        Ok(validate_block(
            &block,
            predecessor.as_deref(),
            hasher.as_ref(),
        ))
    }
}
