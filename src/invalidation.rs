//! Invalidation Module
//!
//! Caller-side invalidation by key prefix. The cache only deletes exact keys,
//! so this scans a `keys()` snapshot and deletes the matches.

use tracing::debug;

use crate::cache::LruCache;

/// Deletes every key starting with `prefix`, typically a query-type tag
/// such as `"posts:"`. Returns the number of entries removed.
pub fn invalidate_prefix<T, E>(cache: &LruCache<T, E>, prefix: &str) -> usize {
    let mut removed = 0;
    for key in cache.keys() {
        if key.starts_with(prefix) && cache.delete(&key) {
            removed += 1;
        }
    }
    debug!(prefix, removed, "Invalidated cache entries by prefix");
    removed
}
