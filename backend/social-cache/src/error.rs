//! Error types for the cache layer and the write-path orchestrators.

use thiserror::Error;

/// Internal cache store errors.
///
/// These never cross the service boundary: the store adapter converts every
/// one of them into a miss (reads) or a no-op (writes) and logs a warning.
/// The cache is best-effort; an outage must degrade, never crash a caller.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the write-path orchestrators.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status class for the transport layer. The HTTP layer itself lives
    /// outside this crate; it only needs the numeric mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::InvalidInput(_) => 400,
            ServiceError::AlreadyExists(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Forbidden(_) => 403,
            ServiceError::Repository(_) | ServiceError::Internal(_) => 500,
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
