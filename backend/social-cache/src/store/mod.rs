//! Cache store adapter.
//!
//! Two layers: [`CacheBackend`] is the raw, fallible command surface
//! (implemented for Redis and for an in-process map), and [`CacheStore`]
//! wraps it with the degradation policy every caller relies on — read
//! failures become misses, write failures become no-ops, everything gets a
//! logged warning. Callers never see a store error.

mod memory;
mod redis;

pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;

use crate::error::CacheError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Raw key-value command surface required from the underlying store.
///
/// Membership lists are score-ordered sets: `zadd` on an existing member
/// updates its score without changing the distinct-member set (Redis ZADD
/// semantics, which both backends follow).
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;
    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), CacheError>;
    async fn zrem(&self, key: &str, member: &str) -> Result<(), CacheError>;
    /// Full member range in ascending score order; empty if the key is absent.
    async fn zrange_members(&self, key: &str) -> Result<Vec<String>, CacheError>;
    async fn del(&self, key: &str) -> Result<(), CacheError>;
    /// Incremental scan-and-delete of every key matching a glob pattern.
    /// Returns the number of keys deleted.
    async fn scan_delete(&self, pattern: &str) -> Result<u64, CacheError>;
}

/// Handle for an in-flight pattern deletion.
///
/// The scan runs on its own task and finishes whether or not the handle is
/// awaited; dropping the handle is the fire-and-forget path for hot writes,
/// awaiting it is the deterministic path for tests.
pub struct PatternDelete {
    handle: JoinHandle<u64>,
}

impl PatternDelete {
    /// Whether the scan task has already run to completion.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the scan to finish; returns the number of keys deleted.
    pub async fn wait(self) -> u64 {
        match self.handle.await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("pattern delete task failed to join: {}", e);
                0
            }
        }
    }
}

/// Best-effort store adapter shared by every cache component.
pub struct CacheStore<B> {
    backend: Arc<B>,
}

impl<B> Clone for CacheStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: CacheBackend + 'static> CacheStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Get a string value; store failures degrade to a miss.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("cache get failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Set a string value with a TTL; returns whether the write took effect.
    pub async fn set_string(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        match self.backend.set_ex(key, value, ttl_seconds).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache set failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Get and deserialize a JSON value. Malformed cached JSON is a miss,
    /// same as a store failure: the caller recomputes and repopulates.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_string(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("cache deserialization failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize and set a JSON value with a TTL.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("cache serialization failed for {}: {}", key, e);
                return false;
            }
        };
        self.set_string(key, &json, ttl_seconds).await
    }

    /// Add a member to a membership list with an insertion score.
    /// Re-adding an existing member updates its score; the distinct-member
    /// set is unchanged.
    pub async fn add_member(&self, key: &str, member: i64, score: f64) -> bool {
        match self.backend.zadd(key, &member.to_string(), score).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache list add failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Remove a member from a membership list. Removing an absent member is
    /// a no-op, not an error.
    pub async fn remove_member(&self, key: &str, member: i64) -> bool {
        match self.backend.zrem(key, &member.to_string()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache list remove failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Full membership list in insertion-score order, mapped to integer ids.
    /// Missing keys and store failures both yield an empty list; members
    /// that fail to parse as integers are skipped.
    pub async fn list_members(&self, key: &str) -> Vec<i64> {
        let members = match self.backend.zrange_members(key).await {
            Ok(members) => members,
            Err(e) => {
                warn!("cache list read failed for {}: {}", key, e);
                return Vec::new();
            }
        };
        members
            .iter()
            .filter_map(|m| match m.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("skipping non-numeric member {:?} in {}", m, key);
                    None
                }
            })
            .collect()
    }

    /// Unconditional key delete; no-op if absent.
    pub async fn delete_key(&self, key: &str) -> bool {
        match self.backend.del(key).await {
            Ok(()) => true,
            Err(e) => {
                warn!("cache delete failed for {}: {}", key, e);
                false
            }
        }
    }

    /// Delete every key matching a glob pattern on a background task.
    ///
    /// The scan is incremental and bounded so it never blocks the store,
    /// and it runs to completion even if the returned handle is dropped.
    /// A failed scan is logged, never surfaced.
    pub fn delete_keys_by_pattern(&self, pattern: &str) -> PatternDelete {
        let backend = Arc::clone(&self.backend);
        let pattern = pattern.to_string();
        let handle = tokio::spawn(async move {
            match backend.scan_delete(&pattern).await {
                Ok(deleted) => {
                    if deleted > 0 {
                        debug!("pattern delete {} removed {} keys", pattern, deleted);
                    }
                    deleted
                }
                Err(e) => {
                    warn!("pattern delete failed for {}: {}", pattern, e);
                    0
                }
            }
        });
        PatternDelete { handle }
    }
}
