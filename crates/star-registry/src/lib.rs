//! # Star Registry
//!
//! Ownership claims over stars, recorded on a tamper-evident block ledger.
//!
//! ## Overview
//!
//! - **Challenges**: a claimant asks for a challenge, signs it with the key
//!   behind their address, and submits it back within the validity window
//! - **Claims**: an accepted claim is sealed as one block on the ledger
//! - **Queries**: blocks by digest or position, stars by claimant address
//! - **Audits**: recompute every digest and check every predecessor link
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use star_registry::{Registry, RegistryConfig};
//! use star_registry::core::Keypair;
//!
//! # async fn example() -> star_registry::Result<()> {
//! let registry = Registry::new(RegistryConfig::default())?;
//! let keypair = Keypair::generate();
//! let address = keypair.address();
//!
//! let message = registry.issue_challenge(&address).await;
//! let signature = keypair.sign_message(&message);
//! let block = registry
//!     .accept_claim(&address, &message, &signature, json!({"ra": "10h", "dec": "-5d"}))
//!     .await?;
//! assert_eq!(block.position, 1);
//!
//! let stars = registry.find_by_address(&address).await?;
//! assert_eq!(stars.len(), 1);
//!
//! assert!(registry.audit().await?.is_consistent());
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! - `star_registry::core` - Blocks, digests, claims and primitives
//! - `star_registry::ledger` - The append-only block sequence

pub mod audit;
pub mod challenge;
pub mod config;
pub mod error;
pub mod query;
pub mod registry;

// Re-export component crates
pub use star_registry_core as core;
pub use star_registry_ledger as ledger;

pub use audit::AuditReport;
pub use challenge::Challenge;
pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use query::{AddressScan, SkippedEntry};
pub use registry::Registry;

pub use star_registry_core::{
    Block, BlockDigest, ClaimPayload, Keypair, StarRecord, ValidationError,
};
pub use star_registry_ledger::Ledger;
