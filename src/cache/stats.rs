//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! byte usage.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Sum of the estimated sizes of all stored entries, in bytes
    pub size: usize,
    /// Current number of entries in the cache
    pub entries: usize,
    /// hits / (hits + misses), 0.0 before any lookup
    pub hit_rate: f64,
    /// Mean estimated entry size, 0.0 when empty
    pub avg_entry_size: f64,
    /// Earliest insertion timestamp among stored entries
    pub oldest_entry: Option<u64>,
    /// Latest insertion timestamp among stored entries
    pub newest_entry: Option<u64>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
        self.refresh_hit_rate();
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
        self.refresh_hit_rate();
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Usage ==
    /// Updates byte and entry totals and the derived average.
    pub fn set_usage(&mut self, size: usize, entries: usize) {
        self.size = size;
        self.entries = entries;
        self.avg_entry_size = if entries == 0 {
            0.0
        } else {
            size as f64 / entries as f64
        };
    }

    fn refresh_hit_rate(&mut self) {
        let total = self.hits + self.misses;
        self.hit_rate = if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        };
    }
}

// == Size Info ==
/// Byte budget usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeInfo {
    pub used: usize,
    pub max: usize,
    /// `used / max * 100`
    pub percentage: f64,
}

impl SizeInfo {
    pub fn new(used: usize, max: usize) -> Self {
        let percentage = if max == 0 {
            0.0
        } else {
            used as f64 / max as f64 * 100.0
        };
        Self {
            used,
            max,
            percentage,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hit_rate, 0.0);
        assert!(stats.oldest_entry.is_none());
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate, 1.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut stats = CacheStats::new();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions, 2);
    }

    #[test]
    fn test_set_usage() {
        let mut stats = CacheStats::new();
        stats.set_usage(300, 4);
        assert_eq!(stats.size, 300);
        assert_eq!(stats.entries, 4);
        assert_eq!(stats.avg_entry_size, 75.0);

        stats.set_usage(0, 0);
        assert_eq!(stats.avg_entry_size, 0.0);
    }

    #[test]
    fn test_size_info_percentage() {
        let info = SizeInfo::new(256, 1024);
        assert_eq!(info.percentage, 25.0);
        assert_eq!(SizeInfo::new(0, 0).percentage, 0.0);
    }
}
