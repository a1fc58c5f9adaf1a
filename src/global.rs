//! Global Cache Module
//!
//! Process-wide cache for JSON query results, constructed on first use and
//! torn down explicitly.
//!
//! Nothing inside the crate depends on it; it is a convenience for the
//! composition root. Components that can take an injected [`LruCache`]
//! should.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::LruCache;
use crate::config::CacheConfig;

static GLOBAL_CACHE: Lazy<Mutex<Option<Arc<LruCache<Value>>>>> = Lazy::new(|| Mutex::new(None));

/// Returns the global cache, building it from `config` on the first call.
///
/// Later calls return the existing instance and ignore `config`.
pub fn get_global_cache(config: Option<CacheConfig>) -> Arc<LruCache<Value>> {
    let mut slot = GLOBAL_CACHE.lock();

    if let Some(cache) = slot.as_ref() {
        if config.is_some() {
            debug!("Global cache already initialized, ignoring new configuration");
        }
        return Arc::clone(cache);
    }

    let config = config.unwrap_or_default();
    info!(
        max_entries = config.max_entries,
        max_size = config.max_size,
        "Initializing global cache"
    );
    let cache = Arc::new(LruCache::new(config));
    *slot = Some(Arc::clone(&cache));
    cache
}

/// Empties the global cache if it exists, keeping the instance.
pub fn clear_global_cache() {
    if let Some(cache) = GLOBAL_CACHE.lock().as_ref() {
        cache.clear();
    }
}

/// Stops the global cache's sweep, empties it and drops it, so the next
/// [`get_global_cache`] builds a fresh instance.
pub fn destroy_global_cache() {
    let cache = GLOBAL_CACHE.lock().take();
    if let Some(cache) = cache {
        cache.stop_cleanup_timer();
        cache.clear();
        info!("Global cache destroyed");
    }
}
