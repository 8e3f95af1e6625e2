use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::warn;

/// Redis connection pool built on the auto-reconnecting connection manager.
///
/// The manager is cheaply cloneable; every clone shares the same underlying
/// multiplexed connection and reconnect logic.
pub struct RedisPool {
    manager: ConnectionManager,
}

impl RedisPool {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(normalize_redis_url(redis_url).as_str())
            .context("failed to construct Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;
        Ok(Self { manager })
    }

    pub fn manager(&self) -> ConnectionManager {
        self.manager.clone()
    }

    /// Ping Redis to check connection health and keep the connection alive.
    ///
    /// Intended to be called periodically from a background task to prevent
    /// broken-pipe errors from stale connections.
    pub async fn ping(&self) -> Result<()> {
        redis::cmd("PING")
            .query_async::<_, String>(&mut self.manager.clone())
            .await
            .map_err(|e| {
                warn!("Redis PING failed: {}", e);
                e
            })
            .context("Redis health check failed")?;
        Ok(())
    }
}

/// Accept bare `host:port` endpoints as well as full `redis://` URLs.
pub fn normalize_redis_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("redis://") || trimmed.starts_with("rediss://") {
        trimmed.to_string()
    } else {
        format!("redis://{}", trimmed)
    }
}
