//! Memoization Module
//!
//! Cache key generation and the `Memoized` wrapper that puts a cache in
//! front of a pure function.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::{LruCache, SizeEstimator};
use crate::error::Result;
use crate::global::get_global_cache;

// == Cache Keys ==
/// Builds `query_type:{params}` with parameter names sorted, so insertion
/// order never changes the key.
///
/// Keys are the full serialization, not a hash, so distinct parameter sets
/// never collide.
pub fn generate_cache_key(query_type: &str, params: &Map<String, Value>) -> String {
    let canonical = canonicalize(Value::Object(params.clone()));
    format!("{query_type}:{canonical}")
}

/// Typed variant of [`generate_cache_key`] for any serializable parameter
/// value, such as a filter struct.
pub fn cache_key_for<P: Serialize + ?Sized>(query_type: &str, params: &P) -> Result<String> {
    let canonical = canonicalize(serde_json::to_value(params)?);
    Ok(format!("{query_type}:{canonical}"))
}

/// Sorts object keys at every depth.
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(String, Value)> = map.into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, canonicalize(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

// == Key Generator ==
/// Derives a cache key from a call's arguments.
///
/// Returning `None` makes that call bypass the cache.
pub trait KeyGenerator<A: ?Sized> {
    fn generate(&self, args: &A) -> Option<String>;
}

impl<A: ?Sized, F> KeyGenerator<A> for F
where
    F: Fn(&A) -> String,
{
    fn generate(&self, args: &A) -> Option<String> {
        Some(self(args))
    }
}

/// Default generator: canonical JSON of the arguments.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArgsKey;

impl<A: Serialize + ?Sized> KeyGenerator<A> for ArgsKey {
    fn generate(&self, args: &A) -> Option<String> {
        serde_json::to_value(args)
            .map(|value| canonicalize(value).to_string())
            .ok()
    }
}

// == Cache Backend ==
/// The two cache operations a memoized function needs.
pub trait CacheBackend<T> {
    fn lookup(&self, key: &str) -> Option<Arc<T>>;
    fn store(&self, key: String, data: Arc<T>, ttl: Option<u64>) -> bool;
}

impl<T, E: SizeEstimator<T>> CacheBackend<T> for LruCache<T, E> {
    fn lookup(&self, key: &str) -> Option<Arc<T>> {
        self.get(key)
    }

    fn store(&self, key: String, data: Arc<T>, ttl: Option<u64>) -> bool {
        self.set_shared(key, data, ttl)
    }
}

impl<T, C: CacheBackend<T> + ?Sized> CacheBackend<T> for Arc<C> {
    fn lookup(&self, key: &str) -> Option<Arc<T>> {
        (**self).lookup(key)
    }

    fn store(&self, key: String, data: Arc<T>, ttl: Option<u64>) -> bool {
        (**self).store(key, data, ttl)
    }
}

impl<T, C: CacheBackend<T> + ?Sized> CacheBackend<T> for &C {
    fn lookup(&self, key: &str) -> Option<Arc<T>> {
        (**self).lookup(key)
    }

    fn store(&self, key: String, data: Arc<T>, ttl: Option<u64>) -> bool {
        (**self).store(key, data, ttl)
    }
}

// == Memoized ==
/// A function with a cache in front of it.
///
/// On a hit the wrapped function is not called at all, so any side effect it
/// has is skipped. Only wrap pure functions.
#[derive(Debug, Clone)]
pub struct Memoized<F, G, C> {
    func: F,
    key_generator: G,
    cache: C,
    ttl: Option<u64>,
}

/// Wraps `func` with `cache`, keyed by [`ArgsKey`] and the cache's default TTL.
pub fn with_cache<F, C>(func: F, cache: C) -> Memoized<F, ArgsKey, C> {
    Memoized {
        func,
        key_generator: ArgsKey,
        cache,
        ttl: None,
    }
}

/// Wraps `func` with the process-wide cache.
pub fn with_global_cache<F>(func: F) -> Memoized<F, ArgsKey, Arc<LruCache<Value>>> {
    with_cache(func, get_global_cache(None))
}

impl<F, G, C> Memoized<F, G, C> {
    /// Replaces the key generator.
    pub fn key_generator<G2>(self, key_generator: G2) -> Memoized<F, G2, C> {
        Memoized {
            func: self.func,
            key_generator,
            cache: self.cache,
            ttl: self.ttl,
        }
    }

    /// TTL in milliseconds for stored results.
    pub fn ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl = Some(ttl_ms);
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the cached result for `args`, computing and storing it on a
    /// miss.
    pub fn call<A, R>(&self, args: &A) -> Arc<R>
    where
        A: ?Sized,
        F: Fn(&A) -> R,
        G: KeyGenerator<A>,
        C: CacheBackend<R>,
    {
        let Some(key) = self.key_generator.generate(args) else {
            debug!("No cache key for arguments, calling through");
            return Arc::new((self.func)(args));
        };

        if let Some(hit) = self.cache.lookup(&key) {
            return hit;
        }

        let result = Arc::new((self.func)(args));
        self.cache.store(key, Arc::clone(&result), self.ttl);
        result
    }
}
