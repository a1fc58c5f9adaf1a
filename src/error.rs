//! Error types for the query cache
//!
//! Provides unified error handling using thiserror. Cache operations themselves
//! never fail; only configuration and persistence edges return errors.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the query cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration values that cannot produce a working cache
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot or key serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;
