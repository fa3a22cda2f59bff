//! The ledger: an ordered, append-only sequence of sealed blocks.
//!
//! One writer at a time. Appends are serialized by a writer mutex held
//! across "read tip, seal, publish", so two appends can never link to the
//! same predecessor. Readers take a read lock only long enough to clone
//! `Arc`s, and only ever see fully sealed blocks.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, RwLock};

use star_registry_core::{Block, BlockDigest, BlockHasher, Clock, GENESIS_PAYLOAD};

use crate::error::{LedgerError, Result};

/// The append-only block sequence.
pub struct Ledger {
    inner: RwLock<LedgerInner>,
    /// Serializes appends. Held for the whole read-seal-publish section.
    writer: Mutex<()>,
    hasher: Arc<dyn BlockHasher>,
    clock: Arc<dyn Clock>,
}

struct LedgerInner {
    /// Blocks indexed by position.
    blocks: Vec<Arc<Block>>,
    /// Digest index: digest -> position.
    by_digest: HashMap<BlockDigest, u64>,
}

impl LedgerInner {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_digest: HashMap::new(),
        }
    }

    fn publish(&mut self, block: Arc<Block>) {
        // First occurrence wins; only restored sequences can repeat a digest.
        self.by_digest.entry(block.digest).or_insert(block.position);
        self.blocks.push(block);
    }

    fn height(&self) -> i64 {
        self.blocks.len() as i64 - 1
    }
}

impl Ledger {
    /// Create a ledger and seal its genesis block.
    ///
    /// The returned ledger is always ready: height is 0, never -1.
    pub fn new(hasher: Arc<dyn BlockHasher>, clock: Arc<dyn Clock>) -> Result<Self> {
        let genesis = Block::seal(0, None, clock.now_secs(), GENESIS_PAYLOAD, hasher.as_ref())?;
        tracing::debug!(digest = %genesis.digest, "sealed genesis block");

        let mut inner = LedgerInner::new();
        inner.publish(Arc::new(genesis));

        Ok(Self {
            inner: RwLock::new(inner),
            writer: Mutex::new(()),
            hasher,
            clock,
        })
    }

    /// Adopt an existing block sequence without re-sealing it.
    ///
    /// Positions must run `0..n`. Digests and links are not checked here;
    /// run an audit for that. An empty sequence behaves like [`Ledger::new`].
    pub fn restore(
        blocks: Vec<Block>,
        hasher: Arc<dyn BlockHasher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if blocks.is_empty() {
            return Self::new(hasher, clock);
        }

        let mut inner = LedgerInner::new();
        for (index, block) in blocks.into_iter().enumerate() {
            if block.position != index as u64 {
                return Err(LedgerError::NonContiguous {
                    index,
                    position: block.position,
                });
            }
            inner.publish(Arc::new(block));
        }
        tracing::debug!(height = inner.height(), "restored ledger");

        Ok(Self {
            inner: RwLock::new(inner),
            writer: Mutex::new(()),
            hasher,
            clock,
        })
    }

    /// Highest valid position (length minus one).
    pub async fn height(&self) -> i64 {
        self.inner.read().await.height()
    }

    /// Number of sealed blocks.
    pub async fn len(&self) -> usize {
        self.inner.read().await.blocks.len()
    }

    /// Whether the ledger holds no blocks. Never true for a constructed ledger.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.blocks.is_empty()
    }

    /// Seal a block carrying `payload` and publish it as the new tip.
    ///
    /// On error the ledger is unchanged.
    pub async fn append(&self, payload: impl Into<Bytes>) -> Result<Arc<Block>> {
        let _writer = self.writer.lock().await;

        let (position, previous_digest) = {
            let inner = self.inner.read().await;
            let previous = inner.blocks.last().map(|tip| tip.digest);
            (inner.blocks.len() as u64, previous)
        };

        let block = Block::seal(
            position,
            previous_digest,
            self.clock.now_secs(),
            payload,
            self.hasher.as_ref(),
        )?;
        let block = Arc::new(block);

        self.inner.write().await.publish(Arc::clone(&block));
        tracing::debug!(position, digest = %block.digest, "appended block");

        Ok(block)
    }

    /// Get a block by digest.
    pub async fn get_by_digest(&self, digest: &BlockDigest) -> Option<Arc<Block>> {
        let inner = self.inner.read().await;
        let position = *inner.by_digest.get(digest)?;
        inner.blocks.get(position as usize).cloned()
    }

    /// Get a block by position.
    pub async fn get_by_position(&self, position: u64) -> Option<Arc<Block>> {
        let inner = self.inner.read().await;
        let index = usize::try_from(position).ok()?;
        inner.blocks.get(index).cloned()
    }

    /// Blocks with `start <= position <= end`, ordered by position.
    pub async fn range(&self, start: u64, end: u64) -> Vec<Arc<Block>> {
        let inner = self.inner.read().await;
        inner
            .blocks
            .iter()
            .filter(|b| b.position >= start && b.position <= end)
            .cloned()
            .collect()
    }

    /// The current tip.
    pub async fn tip(&self) -> Option<Arc<Block>> {
        self.inner.read().await.blocks.last().cloned()
    }

    /// A consistent point-in-time view of every block.
    pub async fn snapshot(&self) -> Vec<Arc<Block>> {
        self.inner.read().await.blocks.clone()
    }

    /// The digest primitive this ledger seals with.
    pub fn hasher(&self) -> Arc<dyn BlockHasher> {
        Arc::clone(&self.hasher)
    }

    /// The clock this ledger stamps blocks with.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}
