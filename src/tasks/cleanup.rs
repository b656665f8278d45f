//! TTL Sweep Task
//!
//! Background task that periodically reclaims expired cache entries.
//! Reads already treat expired entries as misses, so the sweep only frees
//! memory earlier; it never changes what a lookup returns.

use std::fmt::Debug;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically removes expired cache entries.
///
/// The task sleeps for `cleanup_interval_secs` (at least one second) between
/// runs and takes the write lock only for the duration of each sweep.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = CacheStore::<String>::new(CacheOptions::default())?.into_shared();
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: SharedCache<V>, cleanup_interval_secs: u64) -> JoinHandle<()>
where
    V: Clone + Send + Sync + Debug + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.cleanup_expired();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL sweep removed expired entries");
            } else {
                debug!(remaining, "TTL sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOptions, CacheStore, Policy, Ttl};

    fn shared(policy: Policy, ttl_secs: u64) -> SharedCache<String> {
        let options = CacheOptions::default()
            .with_policy(policy)
            .with_capacity(100)
            .with_ttl(Ttl::from_secs(ttl_secs).unwrap());
        CacheStore::new(options).unwrap().into_shared()
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        for policy in [Policy::Recency, Policy::Frequency] {
            let cache = shared(policy, 1);
            cache
                .write()
                .await
                .put("expire_soon", "value".to_string())
                .unwrap();

            let handle = spawn_cleanup_task(cache.clone(), 1);

            // Entry expires after 1s; the sweep runs at 1s and 2s
            tokio::time::sleep(Duration::from_millis(2500)).await;

            {
                let cache_guard = cache.read().await;
                assert!(cache_guard.is_empty(), "Expired entry should have been swept");
                assert_eq!(cache_guard.stats().expirations, 1);
            }

            handle.abort();
        }
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = shared(Policy::Frequency, 3600);
        cache
            .write()
            .await
            .put("long_lived", "value".to_string())
            .unwrap();

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut cache_guard = cache.write().await;
            assert_eq!(cache_guard.get("long_lived"), Some("value".to_string()));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = shared(Policy::Recency, 60);

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
