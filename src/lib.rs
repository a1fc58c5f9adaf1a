//! Query Cache - An in-process cache for expensive read queries
//!
//! Provides a TTL-aware LRU cache bounded by entry count and total byte
//! size, a memoizing wrapper for pure functions, and order-independent
//! cache key generation.

pub mod cache;
pub mod config;
pub mod error;
pub mod global;
pub mod invalidation;
pub mod memo;
pub mod tasks;

pub use cache::{CacheEntry, CacheStats, LruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use global::{clear_global_cache, destroy_global_cache, get_global_cache};
pub use invalidation::invalidate_prefix;
pub use memo::{cache_key_for, generate_cache_key, with_cache, with_global_cache, Memoized};
