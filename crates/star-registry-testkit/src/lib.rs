//! # Star Registry Testkit
//!
//! Testing utilities for the star registry.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known blocks with their expected digests
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Claimant keys, a controllable clock, and ledger helpers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use star_registry_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, hex) in verify_all_vectors() {
//!     assert!(ok, "{name}: {hex}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use star_registry_testkit::fixtures::{ManualClock, TestFixture};
//!
//! let clock = ManualClock::new(1_700_000_000);
//! let fixture = TestFixture::new();
//! let (message, signature) = fixture.signed_challenge_at(clock.now());
//! assert!(message.ends_with(":starRegistry"));
//! assert_eq!(signature.len(), 128);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    garbage_payload, manual_ledger, multi_party_fixtures, FailingHasher, ManualClock, TestFixture,
};
pub use generators::{star, BlockParams};
pub use vectors::{all_vectors, block_from_vector, verify_all_vectors, GoldenVector};
