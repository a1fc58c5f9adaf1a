//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for `interval` between runs and locks the store only for
/// the duration of a sweep. It holds a weak reference and exits on its own
/// once the store has been dropped.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<String>::new(config)));
/// let handle = spawn_cleanup_task(&Handle::current(), Arc::downgrade(&store), interval);
/// // Later, during teardown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<T, E>(
    runtime: &Handle,
    store: Weak<Mutex<CacheStore<T, E>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
    E: Send + 'static,
{
    runtime.spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let Some(cache) = store.upgrade() else {
                debug!("Cache dropped, TTL cleanup task exiting");
                break;
            };
            let removed = cache.lock().cleanup_expired();
            drop(cache);

            // Log cleanup statistics
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
