//! # Star Registry Ledger
//!
//! The single-writer, append-only block sequence behind the star registry.
//!
//! ## Overview
//!
//! [`Ledger`] owns the ordered sequence of sealed blocks. It is created with
//! its genesis block already sealed, grows by exactly one block per
//! successful [`Ledger::append`], and never shrinks, reorders or mutates a
//! sealed block. Height is always derived from the sequence length.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use star_registry_core::{Sha256Hasher, SystemClock};
//! use star_registry_ledger::Ledger;
//!
//! # async fn example() {
//! let ledger = Ledger::new(Arc::new(Sha256Hasher), Arc::new(SystemClock)).unwrap();
//! assert_eq!(ledger.height().await, 0);
//!
//! let block = ledger.append(b"payload".to_vec()).await.unwrap();
//! assert_eq!(block.position, 1);
//! # }
//! ```
//!
//! ## Design Notes
//!
//! - **Serialized appends**: a writer mutex makes read-tip/seal/publish atomic
//! - **Snapshot reads**: readers clone `Arc<Block>`s and never see a block
//!   before its digest is sealed
//! - **No persistence**: [`Ledger::restore`] adopts a sequence held elsewhere

pub mod error;
pub mod ledger;

pub use error::{LedgerError, Result};
pub use ledger::Ledger;
