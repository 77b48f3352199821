//! In-memory TTL cache for archive responses
//!
//! Entries are keyed by `{endpoint}:{fingerprint}` where the fingerprint is
//! a SHA-256 hash of the canonical query string. Keeping the endpoint in
//! clear text makes prefix invalidation possible: purging one endpoint's
//! entries (for example a user's cached submission history) is a prefix
//! delete, without knowing which parameter combinations were cached.
//!
//! Expiry is lazy: a read past the expiry instant evicts the entry and
//! reports a miss.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory response cache with a fixed TTL
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create a cache whose entries live for `ttl` after insertion
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Build the cache key for an endpoint and its query parameters.
    ///
    /// Parameter order is significant: callers supply parameters in a fixed
    /// order per endpoint, so identical requests always produce identical
    /// keys.
    pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
        let mut hasher = Sha256::new();
        for (name, value) in params {
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(b"&");
        }
        format!("{endpoint}:{:x}", hasher.finalize())
    }

    /// Get a non-expired value, evicting it lazily if the TTL has passed
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value, overwriting any previous entry for the key
    pub fn insert(&self, key: String, value: Value) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Remove an exact key; returns whether an entry existed
    pub fn remove(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key).is_some()
    }

    /// Remove every entry whose key starts with `prefix`; returns the count
    pub fn remove_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Drop all entries
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of entries, including any not yet lazily evicted
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Hit/miss counters since construction
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
