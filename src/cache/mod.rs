//! Per-instance summary cache with timed expiry.
//!
//! Entries carry an absolute expiry stamped at insertion and are compared
//! on lookup; `get` removes a stale entry it finds, so no background timer
//! is involved. The cache is owned by the server state and injected into
//! handlers, never a process global. Clones share the same map, which
//! keeps it cheap to hand to concurrent requests.
//!
//! There is deliberately no locking around a caller's read-then-fetch
//! window: two concurrent misses for the same address may both reach the
//! upstream. The second insert simply overwrites the first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::summary::WalletSummary;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: WalletSummary,
    expires_at: Instant,
}

/// Thread-safe TTL cache mapping wallet addresses to summaries.
#[derive(Clone)]
pub struct SummaryCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl SummaryCache {
    /// Create an empty cache whose entries live for `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Look up a summary, evicting it first if it has expired.
    pub fn get(&self, address: &str) -> Option<WalletSummary> {
        let expired = match self.inner.get(address) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            // The read guard is dropped above; safe to take a write lock.
            self.inner.remove(address);
        }
        None
    }

    /// Insert a summary, replacing any previous entry for the address
    /// and restarting its lifetime.
    pub fn insert(&self, address: String, value: WalletSummary) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.inner.insert(address, entry);
    }

    /// Drop one address unconditionally.
    pub fn evict(&self, address: &str) {
        self.inner.remove(address);
    }

    /// Sweep out every expired entry. `get` already evicts lazily; this
    /// only reclaims memory for addresses that are never asked for again.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.inner.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Entry lifetime this cache was built with.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for SummaryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
