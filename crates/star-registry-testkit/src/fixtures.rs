//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use star_registry_core::{BlockDigest, BlockHasher, Clock, CoreError, Keypair, Sha256Hasher};
use star_registry_ledger::Ledger;

/// Tag the default registry configuration closes challenges with.
pub const PROTOCOL_TAG: &str = "starRegistry";

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.now()
    }
}

/// A SHA-256 hasher that can be switched into failure.
#[derive(Debug, Default)]
pub struct FailingHasher {
    failing: AtomicBool,
}

impl FailingHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl BlockHasher for FailingHasher {
    fn digest(&self, data: &[u8]) -> Result<BlockDigest, CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::HashingFailure("hasher switched off".into()));
        }
        Ok(Sha256Hasher::hash(data))
    }
}

/// A claimant with a keypair.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The claimant's address.
    pub fn address(&self) -> String {
        self.keypair.address()
    }

    /// The challenge message the registry would issue at `issued_at`.
    pub fn challenge_at(&self, issued_at: i64) -> String {
        format!("{}:{}:{}", self.address(), issued_at, PROTOCOL_TAG)
    }

    /// Sign an arbitrary message.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign_message(message)
    }

    /// A challenge issued at `issued_at` together with its signature.
    pub fn signed_challenge_at(&self, issued_at: i64) -> (String, String) {
        let message = self.challenge_at(issued_at);
        let signature = self.sign(&message);
        (message, signature)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[31] = 0x5a;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// A SHA-256 ledger driven by `clock`.
pub fn manual_ledger(clock: Arc<ManualClock>) -> Arc<Ledger> {
    match Ledger::new(Arc::new(Sha256Hasher), clock) {
        Ok(ledger) => Arc::new(ledger),
        Err(e) => panic!("sealing genesis with SHA-256 cannot fail: {e}"),
    }
}

/// Bytes that never decode as a claim.
pub fn garbage_payload() -> Vec<u8> {
    vec![0xff, 0x00, 0x13, 0x37]
}
