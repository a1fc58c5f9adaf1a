//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Default byte budget (50 MiB)
pub const DEFAULT_MAX_SIZE: usize = 50 * 1024 * 1024;
/// Default entry budget
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
/// Default TTL (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;
/// Default sweep period (1 minute)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 60 * 1000;

/// Cache configuration parameters.
///
/// Immutable once handed to a cache. All values can be configured via
/// environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Maximum total estimated size of all entries, in bytes
    pub max_size: usize,
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in milliseconds for entries stored without an explicit TTL
    #[serde(rename = "defaultTTL")]
    pub default_ttl_ms: u64,
    /// Background sweep period in milliseconds, 0 disables the sweep
    #[serde(rename = "checkInterval")]
    pub check_interval_ms: u64,
    /// Whether hit/miss/eviction counters are maintained
    pub enable_stats: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Byte budget (default: 50 MiB)
    /// - `CACHE_MAX_ENTRIES` - Maximum entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in ms (default: 300000)
    /// - `CACHE_CHECK_INTERVAL_MS` - Sweep period in ms (default: 60000)
    /// - `CACHE_ENABLE_STATS` - `true`/`false` (default: true)
    pub fn from_env() -> Self {
        Self {
            max_size: env_or("CACHE_MAX_SIZE", DEFAULT_MAX_SIZE),
            max_entries: env_or("CACHE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            default_ttl_ms: env_or("CACHE_DEFAULT_TTL_MS", DEFAULT_TTL_MS),
            check_interval_ms: env_or("CACHE_CHECK_INTERVAL_MS", DEFAULT_CHECK_INTERVAL_MS),
            enable_stats: env_or("CACHE_ENABLE_STATS", true),
        }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_default_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    pub fn with_check_interval_ms(mut self, interval_ms: u64) -> Self {
        self.check_interval_ms = interval_ms;
        self
    }

    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.enable_stats = enabled;
        self
    }

    /// Rejects budgets that could never hold an entry.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL_MS,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            enable_stats: true,
        }
    }
}

fn env_or<V: std::str::FromStr>(name: &str, default: V) -> V {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
