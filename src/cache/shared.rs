//! Shared Cache Handle
//!
//! `LruCache` owns a [`CacheStore`] behind a lock together with the
//! background sweep timer, so it can be shared with the sweep task and
//! across callers.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{
    CacheEntry, CacheStats, CacheStore, Clock, EntryInfo, JsonSizeEstimator, SizeEstimator,
    SizeInfo, SystemClock,
};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_cleanup_task;

// == LRU Cache ==
/// TTL-aware LRU cache bounded by entry count and total byte size.
///
/// Every method takes the internal lock once and never awaits, so operations
/// are atomic with respect to each other and to the background sweep.
///
/// The sweep is started on construction when `check_interval_ms > 0` and a
/// tokio runtime is available. Call [`LruCache::stop_cleanup_timer`] before
/// discarding a cache; the task also stops on its own once the cache is
/// dropped.
pub struct LruCache<T, E = JsonSizeEstimator> {
    store: Arc<Mutex<CacheStore<T, E>>>,
    cleanup: Mutex<Option<JoinHandle<()>>>,
}

impl<T, E> LruCache<T, E>
where
    T: Send + Sync + 'static,
    E: Send + 'static,
{
    // == Constructor ==
    /// Creates a cache with the default size estimator and the wall clock.
    pub fn new(config: CacheConfig) -> Self
    where
        E: Default,
    {
        Self::with_parts(config, E::default(), Arc::new(SystemClock))
    }

    /// Like [`LruCache::new`], but rejects unusable budgets.
    pub fn try_new(config: CacheConfig) -> Result<Self>
    where
        E: Default,
    {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_estimator(config: CacheConfig, estimator: E) -> Self {
        Self::with_parts(config, estimator, Arc::new(SystemClock))
    }

    pub fn with_parts(config: CacheConfig, estimator: E, clock: Arc<dyn Clock>) -> Self {
        let check_interval_ms = config.check_interval_ms;
        let cache = Self {
            store: Arc::new(Mutex::new(CacheStore::with_parts(config, estimator, clock))),
            cleanup: Mutex::new(None),
        };
        if check_interval_ms > 0 {
            cache.start_cleanup_timer(Duration::from_millis(check_interval_ms));
        }
        cache
    }

    fn start_cleanup_timer(&self, interval: Duration) {
        match Handle::try_current() {
            Ok(runtime) => {
                let handle = spawn_cleanup_task(&runtime, Arc::downgrade(&self.store), interval);
                *self.cleanup.lock() = Some(handle);
            }
            Err(_) => {
                warn!("No tokio runtime available, expired entries are only removed on access");
            }
        }
    }
}

impl<T, E> LruCache<T, E> {
    // == Stop Cleanup Timer ==
    /// Cancels the background sweep. Safe to call repeatedly or when the
    /// sweep never started.
    pub fn stop_cleanup_timer(&self) {
        if let Some(handle) = self.cleanup.lock().take() {
            handle.abort();
            info!("TTL cleanup task stopped");
        }
    }

    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.store.lock().get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.lock().has(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    /// Empties the cache. The sweep timer keeps running.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn size_info(&self) -> SizeInfo {
        self.store.lock().size_info()
    }

    pub fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        self.store.lock().entry_info(key)
    }

    pub fn export(&self) -> Vec<CacheEntry<T>> {
        self.store.lock().export()
    }

    pub fn cleanup_expired(&self) -> usize {
        self.store.lock().cleanup_expired()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn config(&self) -> CacheConfig {
        self.store.lock().config().clone()
    }
}

impl<T, E: SizeEstimator<T>> LruCache<T, E> {
    /// Stores a payload; see [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, data: T, ttl: Option<u64>) -> bool {
        self.store.lock().set(key, data, ttl)
    }

    pub fn set_shared(&self, key: impl Into<String>, data: Arc<T>, ttl: Option<u64>) -> bool {
        self.store.lock().set_shared(key, data, ttl)
    }

    pub fn preload<K, I>(&self, entries: I) -> usize
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T, Option<u64>)>,
    {
        self.store.lock().preload(entries)
    }

    pub fn import(&self, entries: Vec<CacheEntry<T>>) -> usize {
        self.store.lock().import(entries)
    }
}

impl<T: Serialize, E> LruCache<T, E> {
    pub fn export_json(&self) -> Result<String> {
        self.store.lock().export_json()
    }
}

impl<T: DeserializeOwned, E: SizeEstimator<T>> LruCache<T, E> {
    pub fn import_json(&self, json: &str) -> Result<usize> {
        self.store.lock().import_json(json)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FixedSizeEstimator, ManualClock};

    fn config() -> CacheConfig {
        CacheConfig::default()
            .with_max_entries(10)
            .with_max_size(4096)
            .with_check_interval_ms(0)
    }

    #[test]
    fn test_no_timer_without_interval() {
        let cache: LruCache<String> = LruCache::new(config());
        assert!(!cache.is_cleanup_running());
        // never started, still safe
        cache.stop_cleanup_timer();
        cache.stop_cleanup_timer();
    }

    #[test]
    fn test_no_timer_outside_runtime() {
        let cache: LruCache<String> = LruCache::new(config().with_check_interval_ms(10));
        assert!(!cache.is_cleanup_running());
        assert!(cache.set("a", "1".to_string(), None));
        assert!(cache.has("a"));
    }

    #[test]
    fn test_try_new_rejects_zero_budget() {
        let result: Result<LruCache<String>> = LruCache::try_new(config().with_max_size(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_handle_delegates_to_store() {
        let clock = Arc::new(ManualClock::new(0));
        let cache: LruCache<u32, _> =
            LruCache::with_parts(config(), FixedSizeEstimator(8), clock.clone());

        assert!(cache.set("a", 1, Some(50)));
        assert!(cache.set("b", 2, None));
        assert_eq!(*cache.get("a").unwrap(), 1);
        assert_eq!(cache.keys(), vec!["a", "b"]);
        assert_eq!(cache.size_info().used, 16);

        clock.advance(51);
        assert_eq!(cache.cleanup_expired(), 1);
        assert!(cache.delete("b"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_timer_starts_and_stops() {
        let cache: LruCache<String> = LruCache::new(config().with_check_interval_ms(10));
        assert!(cache.is_cleanup_running());

        cache.stop_cleanup_timer();
        cache.stop_cleanup_timer();
        assert!(!cache.is_cleanup_running());
    }

    #[tokio::test]
    async fn test_timer_sweeps_expired_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let cache: LruCache<String> = LruCache::with_parts(
            config().with_check_interval_ms(20),
            JsonSizeEstimator,
            clock.clone(),
        );

        cache.set("short", "x".to_string(), Some(5));
        cache.set("long", "y".to_string(), Some(60_000));
        clock.advance(10);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().size, 3);
        cache.stop_cleanup_timer();
    }
}
