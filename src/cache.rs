//! Result cache for repeated parses
//!
//! Bounded mapping of `(input-hash, config-fingerprint)` to successful
//! ParseResults. Entries expire on TTL and evict LRU-first under
//! capacity pressure; per-entry hit counts are tracked and surfaced
//! through the statistics. The whole get/populate sequence runs under
//! one lock so concurrent parses of the same input populate at most
//! once.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{hex_encode, CacheConfig, ParserConfig};
use crate::model::ParseResult;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

struct CacheEntry {
    value: ParseResult,
    inserted_at: Instant,
    hit_count: u64,
}

struct Inner {
    entries: LruCache<String, CacheEntry>,
    stats: CacheStats,
}

/// Bounded, TTL-based cache of parse results
pub struct ParseCache {
    inner: Mutex<Inner>,
    ttl: Duration,
}

impl ParseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_size.max(1)).expect("non-zero capacity");
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
            ttl: config.ttl,
        }
    }

    /// Cache key: input-text hash joined with the config fingerprint
    pub fn key(text: &str, config: &ParserConfig) -> String {
        let digest = Sha256::digest(text.as_bytes());
        format!("{}:{}", hex_encode(&digest), config.fingerprint())
    }

    pub fn get(&self, key: &str) -> Option<ParseResult> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let expired = match inner.entries.get_mut(key) {
            Some(entry) => {
                if entry.inserted_at.elapsed() <= self.ttl {
                    entry.hit_count += 1;
                    inner.stats.hits += 1;
                    debug!(key, "cache hit");
                    let value = entry.value.clone();
                    inner.stats.size = inner.entries.len();
                    return Some(value);
                }
                true
            }
            None => false,
        };
        if expired {
            inner.entries.pop(key);
        }
        inner.stats.misses += 1;
        inner.stats.size = inner.entries.len();
        None
    }

    pub fn put(&self, key: String, value: ParseResult) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        // Expired entries go first, before any capacity-driven eviction.
        let stale: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.inserted_at.elapsed() > self.ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for stale_key in stale {
            inner.entries.pop(&stale_key);
            inner.stats.evictions += 1;
        }

        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            hit_count: 0,
        };
        if let Some((evicted_key, _)) = inner.entries.push(key.clone(), entry) {
            if evicted_key != key {
                inner.stats.evictions += 1;
            }
        }
        inner.stats.size = inner.entries.len();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        inner.stats
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.stats.size = 0;
    }
}
