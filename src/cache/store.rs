//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, a byte
//! budget and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::lru::NodeId;
use crate::cache::{
    CacheEntry, CacheStats, Clock, EntryInfo, JsonSizeEstimator, LruTracker, SizeEstimator,
    SizeInfo, SystemClock,
};
use crate::config::CacheConfig;
use crate::error::Result;

#[derive(Debug)]
struct Slot<T> {
    entry: CacheEntry<T>,
    node: NodeId,
}

// == Cache Store ==
/// Synchronous cache engine with LRU eviction, a byte budget and TTL support.
///
/// Every operation completes without blocking. Eviction is driven by recency
/// alone: whenever the entry count or the byte budget would be exceeded, the
/// globally least recently used entry goes first.
#[derive(Debug)]
pub struct CacheStore<T, E = JsonSizeEstimator> {
    /// Key-value storage
    entries: HashMap<String, Slot<T>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of entry sizes, maintained regardless of `enable_stats`
    total_size: usize,
    config: CacheConfig,
    estimator: E,
    clock: Arc<dyn Clock>,
}

impl<T, E: Default> CacheStore<T, E> {
    // == Constructor ==
    /// Creates a new CacheStore using the wall clock and default estimator.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_parts(config, E::default(), Arc::new(SystemClock))
    }
}

impl<T, E> CacheStore<T, E> {
    /// Creates a CacheStore with an explicit size estimator and clock.
    ///
    /// A `max_entries` of zero is raised to one.
    pub fn with_parts(mut config: CacheConfig, estimator: E, clock: Arc<dyn Clock>) -> Self {
        config.max_entries = config.max_entries.max(1);
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            total_size: 0,
            config,
            estimator,
            clock,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves a payload by key.
    ///
    /// A hit marks the entry most recently used. Expired entries are removed
    /// and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<Arc<T>> {
        let now = self.clock.now_ms();

        let live = match self.entries.get(key).map(|slot| slot.entry.is_live(now)) {
            Some(live) => live,
            None => {
                self.record_miss();
                debug!(key, "cache miss");
                return None;
            }
        };

        if !live {
            self.remove_slot(key);
            self.record_miss();
            debug!(key, "cache miss (expired)");
            return None;
        }

        let slot = self.entries.get_mut(key)?;
        slot.entry.hits += 1;
        slot.entry.last_accessed = now;
        self.lru.touch(slot.node);
        let data = Arc::clone(&slot.entry.data);

        self.record_hit();
        debug!(key, "cache hit");
        Some(data)
    }

    // == Has ==
    /// Existence probe with the same lazy expiry as `get`.
    ///
    /// Does not touch recency, hit counters or hit/miss statistics.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();
        match self.entries.get(key).map(|slot| slot.entry.is_live(now)) {
            Some(true) => true,
            Some(false) => {
                self.remove_slot(key);
                false
            }
            None => false,
        }
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it existed.
    ///
    /// Explicit deletion is not an eviction and leaves that counter alone.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_slot(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and resets statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.total_size = 0;
        self.stats = CacheStats::new();
    }

    // == Keys ==
    /// Snapshot of stored keys, most recently used first.
    ///
    /// Expired entries that have not been collected yet are included.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter_newest_first().map(str::to_owned).collect()
    }

    // == Stats ==
    /// Returns a copy of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_usage(self.total_size, self.entries.len());
        stats.oldest_entry = self.entries.values().map(|s| s.entry.timestamp).min();
        stats.newest_entry = self.entries.values().map(|s| s.entry.timestamp).max();
        stats
    }

    pub fn size_info(&self) -> SizeInfo {
        SizeInfo::new(self.total_size, self.config.max_size)
    }

    /// Metadata of a stored entry, without its payload.
    pub fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        let now = self.clock.now_ms();
        self.entries.get(key).map(|slot| slot.entry.info(now))
    }

    // == Export ==
    /// Snapshot of all live entries, least recently used first.
    ///
    /// Entries are copies; payloads are shared immutably.
    pub fn export(&self) -> Vec<CacheEntry<T>> {
        let now = self.clock.now_ms();
        self.lru
            .iter_oldest_first()
            .filter_map(|key| self.entries.get(key))
            .filter(|slot| slot.entry.is_live(now))
            .map(|slot| slot.entry.clone())
            .collect()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| !slot.entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_slot(key);
        }
        expired_keys.len()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_slot(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let slot = self.entries.remove(key)?;
        self.lru.remove(slot.node);
        self.total_size -= slot.entry.size;
        self.refresh_usage();
        Some(slot.entry)
    }

    fn insert_entry(&mut self, entry: CacheEntry<T>) {
        let node = self.lru.push_front(entry.key.clone());
        self.total_size += entry.size;
        self.entries.insert(entry.key.clone(), Slot { entry, node });
        self.refresh_usage();
    }

    /// Evicts least recently used entries until one more entry of
    /// `incoming` bytes fits both budgets.
    fn evict_if_needed(&mut self, incoming: usize) {
        while self.entries.len() >= self.config.max_entries {
            if !self.evict_lru() {
                break;
            }
        }
        while self.total_size + incoming > self.config.max_size {
            if !self.evict_lru() {
                break;
            }
        }
    }

    fn evict_lru(&mut self) -> bool {
        let Some(key) = self.lru.evict_oldest() else {
            return false;
        };
        if let Some(slot) = self.entries.remove(&key) {
            self.total_size -= slot.entry.size;
            self.refresh_usage();
        }
        if self.config.enable_stats {
            self.stats.record_eviction();
        }
        debug!(key = %key, "evicted least recently used entry");
        true
    }

    fn refresh_usage(&mut self) {
        self.stats.set_usage(self.total_size, self.entries.len());
    }

    fn recompute_usage(&mut self) {
        self.total_size = self.entries.values().map(|s| s.entry.size).sum();
        self.refresh_usage();
    }

    fn record_hit(&mut self) {
        if self.config.enable_stats {
            self.stats.record_hit();
        }
    }

    fn record_miss(&mut self) {
        if self.config.enable_stats {
            self.stats.record_miss();
        }
    }
}

impl<T, E: SizeEstimator<T>> CacheStore<T, E> {
    // == Set ==
    /// Stores a payload with an optional TTL in milliseconds.
    ///
    /// Returns `false` without touching the cache when the payload alone is
    /// larger than `max_size`. An existing key is replaced, not added to.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<u64>) -> bool {
        self.set_shared(key, Arc::new(data), ttl)
    }

    /// Same as [`CacheStore::set`] for an already shared payload.
    pub fn set_shared(&mut self, key: impl Into<String>, data: Arc<T>, ttl: Option<u64>) -> bool {
        let key = key.into();
        let size = self.estimator.estimate_size(&data);

        if size > self.config.max_size {
            warn!(
                key = %key,
                size,
                max_size = self.config.max_size,
                "entry exceeds cache size budget, not cached"
            );
            return false;
        }

        self.remove_slot(&key);
        self.evict_if_needed(size);

        let ttl = ttl.unwrap_or(self.config.default_ttl_ms);
        let now = self.clock.now_ms();
        self.insert_entry(CacheEntry::new(key, data, size, ttl, now));
        true
    }

    // == Preload ==
    /// Batch `set`. Returns how many entries were accepted.
    pub fn preload<K, I>(&mut self, entries: I) -> usize
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T, Option<u64>)>,
    {
        let mut accepted = 0;
        for (key, data, ttl) in entries {
            if self.set(key, data, ttl) {
                accepted += 1;
            }
        }
        accepted
    }

    // == Import ==
    /// Replaces the cache contents with previously exported entries.
    ///
    /// Each entry keeps only the TTL it had left, counted from its original
    /// timestamp; entries with nothing left are dropped. Sizes are
    /// re-estimated and both budgets still apply. Returns the number of
    /// entries restored.
    pub fn import(&mut self, entries: Vec<CacheEntry<T>>) -> usize {
        self.clear();
        let now = self.clock.now_ms();

        for entry in entries {
            let remaining = entry.remaining_ttl_ms(now);
            if remaining == 0 {
                debug!(key = %entry.key, "dropping stale entry on import");
                continue;
            }

            let size = self.estimator.estimate_size(&entry.data);
            if size > self.config.max_size {
                warn!(key = %entry.key, size, "imported entry exceeds cache size budget, skipped");
                continue;
            }

            self.remove_slot(&entry.key);
            self.evict_if_needed(size);
            self.insert_entry(CacheEntry {
                size,
                timestamp: now,
                ttl: remaining,
                last_accessed: now,
                ..entry
            });
        }

        self.recompute_usage();
        self.entries.len()
    }
}

impl<T: Serialize, E> CacheStore<T, E> {
    /// JSON encoding of [`CacheStore::export`].
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export())?)
    }
}

impl<T: DeserializeOwned, E: SizeEstimator<T>> CacheStore<T, E> {
    /// Parses a blob produced by `export_json` and imports it.
    ///
    /// The cache is left untouched when the blob does not parse.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let entries: Vec<CacheEntry<T>> = serde_json::from_str(json)?;
        Ok(self.import(entries))
    }
}
