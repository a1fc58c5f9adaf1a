//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and a byte
//! budget.

mod clock;
mod entry;
mod lru;
mod shared;
mod size;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryInfo};
pub use lru::{LruTracker, NodeId};
pub use shared::LruCache;
pub use size::{FixedSizeEstimator, JsonSizeEstimator, SizeEstimator, DEFAULT_ENTRY_SIZE};
pub use stats::{CacheStats, SizeInfo};
pub use store::CacheStore;
