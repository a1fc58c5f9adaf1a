//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cached result with its bookkeeping metadata.
///
/// The payload is shared behind an `Arc` and must be treated as immutable
/// once stored: its `size` is computed at insertion and never recomputed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// Key under which the entry is stored
    pub key: String,
    /// The cached payload
    pub data: Arc<T>,
    /// Estimated size in bytes
    pub size: usize,
    /// Insertion timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Time to live in milliseconds
    pub ttl: u64,
    /// Number of successful reads
    pub hits: u64,
    /// Last successful read, or insertion time (Unix milliseconds)
    pub last_accessed: u64,
}

// Manual impl: deriving would require `T: Clone`.
impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            data: Arc::clone(&self.data),
            size: self.size,
            timestamp: self.timestamp,
            ttl: self.ttl,
            hits: self.hits,
            last_accessed: self.last_accessed,
        }
    }
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now`.
    pub fn new(key: String, data: Arc<T>, size: usize, ttl: u64, now: u64) -> Self {
        Self {
            key,
            data,
            size,
            timestamp: now,
            ttl,
            hits: 0,
            last_accessed: now,
        }
    }

    // == Is Live ==
    /// An entry is live while `now - timestamp <= ttl`.
    ///
    /// A timestamp in the future (clock skew after import) counts as zero
    /// elapsed time.
    pub fn is_live(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) <= self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining TTL in milliseconds, `0` once expired.
    pub fn remaining_ttl_ms(&self, now: u64) -> u64 {
        self.ttl.saturating_sub(now.saturating_sub(self.timestamp))
    }

    /// Metadata snapshot without the payload.
    pub fn info(&self, now: u64) -> EntryInfo {
        EntryInfo {
            key: self.key.clone(),
            size: self.size,
            timestamp: self.timestamp,
            ttl: self.ttl,
            hits: self.hits,
            last_accessed: self.last_accessed,
            remaining_ttl_ms: self.remaining_ttl_ms(now),
        }
    }
}

// == Entry Info ==
/// Entry metadata minus the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    pub key: String,
    pub size: usize,
    pub timestamp: u64,
    pub ttl: u64,
    pub hits: u64,
    pub last_accessed: u64,
    pub remaining_ttl_ms: u64,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ttl: u64, now: u64) -> CacheEntry<String> {
        CacheEntry::new("k".to_string(), Arc::new("v".to_string()), 3, ttl, now)
    }

    #[test]
    fn test_entry_creation() {
        let entry = entry(60_000, 1_000);

        assert_eq!(entry.key, "k");
        assert_eq!(*entry.data, "v");
        assert_eq!(entry.timestamp, 1_000);
        assert_eq!(entry.last_accessed, 1_000);
        assert_eq!(entry.hits, 0);
    }

    #[test]
    fn test_liveness_boundary() {
        let entry = entry(100, 1_000);

        assert!(entry.is_live(1_000));
        assert!(entry.is_live(1_099));
        // now - timestamp == ttl is still live
        assert!(entry.is_live(1_100));
        assert!(!entry.is_live(1_101));
    }

    #[test]
    fn test_liveness_with_future_timestamp() {
        let entry = entry(0, 5_000);
        assert!(entry.is_live(4_000));
    }

    #[test]
    fn test_remaining_ttl() {
        let entry = entry(100, 1_000);

        assert_eq!(entry.remaining_ttl_ms(1_000), 100);
        assert_eq!(entry.remaining_ttl_ms(1_040), 60);
        assert_eq!(entry.remaining_ttl_ms(2_000), 0);
    }

    #[test]
    fn test_clone_shares_payload() {
        let entry = entry(100, 1_000);
        let copy = entry.clone();
        assert!(Arc::ptr_eq(&entry.data, &copy.data));
    }

    #[test]
    fn test_info_omits_payload() {
        let mut entry = entry(100, 1_000);
        entry.hits = 4;

        let info = entry.info(1_030);
        assert_eq!(info.key, "k");
        assert_eq!(info.size, 3);
        assert_eq!(info.hits, 4);
        assert_eq!(info.remaining_ttl_ms, 70);
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry(100, 1_000)).unwrap();
        assert_eq!(json["lastAccessed"], 1_000);
        assert_eq!(json["data"], "v");
    }
}
