//! Read-Through Cache
//!
//! JSON snapshots in the key-value store with no expiry. Entries change
//! only through [`ReadThroughCache::invalidate`].

use std::future::Future;

use platform::kv::{KvError, KvStore};
use serde::{Serialize, de::DeserializeOwned};

/// Sentinel key of the public course list
pub const ALL_COURSES_KEY: &str = "allCourses";

#[derive(Clone)]
pub struct ReadThroughCache {
    store: KvStore,
}

impl ReadThroughCache {
    pub fn new(store: KvStore) -> Self {
        Self { store }
    }

    /// Return the snapshot under `key`, or run `loader` and store its result
    ///
    /// Store failures never fail the read: a broken read falls through to
    /// the loader, a broken write still returns the loaded value. Loader
    /// errors are returned as-is and nothing is stored.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, loading from store");
            }
        }

        let value = loader().await?;

        match serde_json::to_string(&value) {
            Ok(json) => {
                if let Err(e) = self.store.set(key, &json).await {
                    tracing::warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache serialization failed");
            }
        }

        Ok(value)
    }

    /// Drop the entry under `key`; returns whether one existed
    pub async fn invalidate(&self, key: &str) -> Result<bool, KvError> {
        let removed = self.store.del(key).await?;
        tracing::debug!(key = %key, removed, "Cache entry invalidated");
        Ok(removed)
    }
}
