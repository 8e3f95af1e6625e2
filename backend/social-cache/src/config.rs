use serde::{Deserialize, Serialize};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Post detail cache TTL in seconds (1 day)
    #[serde(default = "default_post_detail_ttl")]
    pub post_detail_ttl: u64,
    /// User profile cache TTL in seconds (1 day)
    #[serde(default = "default_user_profile_ttl")]
    pub user_profile_ttl: u64,
    /// Explore page cache TTL in seconds (1 hour)
    #[serde(default = "default_explore_ttl")]
    pub explore_ttl: u64,
    /// SCAN batch size for pattern deletion
    #[serde(default = "default_scan_batch")]
    pub scan_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            post_detail_ttl: default_post_detail_ttl(),
            user_profile_ttl: default_user_profile_ttl(),
            explore_ttl: default_explore_ttl(),
            scan_batch: default_scan_batch(),
        }
    }
}

fn default_post_detail_ttl() -> u64 {
    86400
}

fn default_user_profile_ttl() -> u64 {
    86400
}

fn default_explore_ttl() -> u64 {
    3600
}

fn default_scan_batch() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            redis: RedisConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            cache: CacheConfig {
                post_detail_ttl: env_u64("CACHE_POST_DETAIL_TTL", default_post_detail_ttl())?,
                user_profile_ttl: env_u64("CACHE_USER_PROFILE_TTL", default_user_profile_ttl())?,
                explore_ttl: env_u64("CACHE_EXPLORE_TTL", default_explore_ttl())?,
                scan_batch: env_u64("CACHE_SCAN_BATCH", default_scan_batch() as u64)? as usize,
            },
        })
    }
}

fn env_u64(name: &str, fallback: u64) -> Result<u64, Box<dyn std::error::Error>> {
    match std::env::var(name) {
        Ok(raw) => Ok(raw.parse()?),
        Err(_) => Ok(fallback),
    }
}
