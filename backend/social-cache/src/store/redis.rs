//! Redis implementation of the raw cache backend.
//!
//! Commands mirror the capability surface the cache layer needs: string
//! get/set with TTL, scored membership lists, key delete, and an
//! incremental SCAN+DEL for pattern invalidation.

use super::CacheBackend;
use crate::error::CacheError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;

pub struct RedisBackend {
    conn: ConnectionManager,
    scan_batch: usize,
}

impl RedisBackend {
    /// Connect through the shared pool and wrap the resulting manager.
    /// `scan_batch` comes from [`CacheConfig::scan_batch`](crate::config::CacheConfig).
    pub async fn connect(redis_url: &str, scan_batch: usize) -> anyhow::Result<Self> {
        let pool = redis_utils::RedisPool::connect(redis_url).await?;
        Ok(Self::with_scan_batch(pool.manager(), scan_batch))
    }

    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            scan_batch: 100,
        }
    }

    pub fn with_scan_batch(conn: ConnectionManager, scan_batch: usize) -> Self {
        Self { conn, scan_batch }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.conn.clone())
            .await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<_, ()>(&mut self.conn.clone())
            .await?;
        Ok(())
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), CacheError> {
        redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async::<_, ()>(&mut self.conn.clone())
            .await?;
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<(), CacheError> {
        redis::cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async::<_, ()>(&mut self.conn.clone())
            .await?;
        Ok(())
    }

    async fn zrange_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let members: Vec<String> = redis::cmd("ZRANGE")
            .arg(key)
            .arg(0)
            .arg(-1)
            .query_async(&mut self.conn.clone())
            .await?;
        Ok(members)
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, ()>(&mut self.conn.clone())
            .await?;
        Ok(())
    }

    /// SCAN instead of KEYS so the keyspace is never locked; deletes in
    /// COUNT-bounded batches until the cursor wraps.
    async fn scan_delete(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut cursor: u64 = 0;
        let mut total_deleted: u64 = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(self.scan_batch)
                .query_async(&mut self.conn.clone())
                .await?;

            if !keys.is_empty() {
                redis::cmd("DEL")
                    .arg(&keys)
                    .query_async::<_, ()>(&mut self.conn.clone())
                    .await?;
                total_deleted += keys.len() as u64;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }

        Ok(total_deleted)
    }
}
