//! Key-Value Store
//!
//! Process-wide string store used for session records and cached course
//! documents. Two backends share one cloneable handle:
//! - [`RedisStore`]: a multiplexed `ConnectionManager` that reconnects on its own
//! - [`MemoryStore`]: an in-process map, used when no Redis URI is configured
//!   and in tests
//!
//! Every operation touches a single key and is atomic on its own. Nothing
//! here retries an application command; only the Redis connection itself
//! is re-established in the background.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value store error: {0}")]
    Redis(#[from] RedisError),
}

pub type KvResult<T> = Result<T, KvError>;

// ============================================================================
// Handle
// ============================================================================

/// Cloneable handle to the configured backend
#[derive(Clone)]
pub enum KvStore {
    Redis(RedisStore),
    Memory(MemoryStore),
}

impl KvStore {
    pub fn memory() -> Self {
        KvStore::Memory(MemoryStore::default())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            KvStore::Redis(_) => "redis",
            KvStore::Memory(_) => "memory",
        }
    }

    pub async fn get(&self, key: &str) -> KvResult<Option<String>> {
        match self {
            KvStore::Redis(store) => store.get(key).await,
            KvStore::Memory(store) => Ok(store.get(key).await),
        }
    }

    /// Store without expiry
    pub async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => store.set(key, value).await,
            KvStore::Memory(store) => {
                store.insert(key, value, None).await;
                Ok(())
            }
        }
    }

    /// Store with a time-to-live in seconds, replacing any previous TTL
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => store.set_ex(key, value, ttl_secs).await,
            KvStore::Memory(store) => {
                store
                    .insert(key, value, Some(Duration::from_secs(ttl_secs)))
                    .await;
                Ok(())
            }
        }
    }

    /// Returns `true` when a key was actually removed
    pub async fn del(&self, key: &str) -> KvResult<bool> {
        match self {
            KvStore::Redis(store) => store.del(key).await,
            KvStore::Memory(store) => Ok(store.remove(key).await),
        }
    }

    /// Remaining lifetime in seconds; `None` for missing or non-expiring keys
    pub async fn ttl(&self, key: &str) -> KvResult<Option<u64>> {
        match self {
            KvStore::Redis(store) => store.ttl(key).await,
            KvStore::Memory(store) => Ok(store.ttl(key).await),
        }
    }

    pub async fn ping(&self) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => store.ping().await,
            KvStore::Memory(_) => Ok(()),
        }
    }
}

// ============================================================================
// Redis backend
// ============================================================================

/// Reconnect behaviour of the Redis connection
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Backoff step in milliseconds
    pub factor_ms: u64,
    /// Upper bound for a single reconnect delay in milliseconds
    pub max_delay_ms: u64,
    pub connection_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            factor_ms: 100,
            max_delay_ms: 2_000,
            connection_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(uri: &str, policy: RetryPolicy) -> KvResult<Self> {
        let client = Client::open(uri)?;

        let config = ConnectionManagerConfig::new()
            .set_factor(policy.factor_ms)
            .set_max_delay(policy.max_delay_ms)
            .set_connection_timeout(policy.connection_timeout);

        let connection = client.get_connection_manager_with_config(config).await?;
        tracing::info!("Redis connected");

        Ok(Self { connection })
    }

    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> KvResult<bool> {
        let mut conn = self.connection.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn ttl(&self, key: &str) -> KvResult<Option<u64>> {
        let mut conn = self.connection.clone();
        // -2: missing, -1: no expiry
        let ttl: i64 = conn.ttl(key).await?;
        Ok(u64::try_from(ttl).ok())
    }

    async fn ping(&self) -> KvResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-process backend
///
/// Expired entries are dropped when read, and every write sweeps the rest,
/// so keys that are never read again do not accumulate.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    async fn insert(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
        };
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(key.to_string(), entry);
    }

    async fn remove(&self, key: &str) -> bool {
        let now = Instant::now();
        match self.entries.write().await.remove(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    async fn ttl(&self, key: &str) -> Option<u64> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|entry| !entry.is_expired(now))?;
        let remaining = entry.expires_at?.saturating_duration_since(now);
        // Round up so a fresh `set_ex(.., 60)` reports 60
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        Some(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_get_del() {
        let store = KvStore::memory();

        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        assert!(store.del("k").await.unwrap());
        assert!(!store.del("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_ttl() {
        let store = KvStore::memory();

        store.set("plain", "v").await.unwrap();
        assert_eq!(store.ttl("plain").await.unwrap(), None);
        assert_eq!(store.ttl("missing").await.unwrap(), None);

        store.set_ex("session", "v", 604_800).await.unwrap();
        let ttl = store.ttl("session").await.unwrap().unwrap();
        assert!(ttl > 604_790 && ttl <= 604_800);
    }

    #[tokio::test]
    async fn test_memory_set_replaces_ttl() {
        let store = KvStore::memory();

        store.set_ex("k", "old", 60).await.unwrap();
        store.set("k", "new").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
        assert_eq!(store.ttl("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_expired_entry_is_gone() {
        let store = MemoryStore::default();
        store.insert("k", "v", Some(Duration::ZERO)).await;

        assert_eq!(store.get("k").await, None);
        assert_eq!(store.ttl("k").await, None);
        assert!(!store.remove("k").await);
    }

    #[tokio::test]
    async fn test_write_sweeps_unread_expired_entries() {
        let store = MemoryStore::default();
        store.insert("session:gone", "v", Some(Duration::ZERO)).await;
        store.insert("course:kept", "v", Some(Duration::from_secs(60))).await;
        store.insert("plain", "v", None).await;

        let entries = store.entries.read().await;
        assert_eq!(entries.len(), 2);
        assert!(!entries.contains_key("session:gone"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = KvStore::memory();
        let other = store.clone();

        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some("v".to_string()));
        assert!(other.ping().await.is_ok());
    }

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.factor_ms, 100);
        assert_eq!(policy.max_delay_ms, 2_000);
        assert_eq!(policy.connection_timeout, Duration::from_secs(10));
    }
}
