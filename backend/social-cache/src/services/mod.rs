//! Write-path orchestrators.
//!
//! Each service coordinates a persistence write with the cache calls that
//! must follow it: invalidation after the write succeeds, in a fixed key
//! order, each call independently best-effort. Business idempotence rules
//! (no double-like, no double-follow) are enforced here with a
//! read-before-write membership check; the relationship caches themselves
//! stay unconditional.

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use posts::PostService;
pub use users::UserService;

use crate::error::{ServiceError, ServiceResult};

/// Parse a path/query id parameter into a positive integer id.
///
/// Replaces silent fallback-to-zero parsing: a malformed id is a client
/// error, never a lookup for row zero.
pub fn parse_id(raw: &str) -> ServiceResult<i64> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ServiceError::InvalidInput(format!("Invalid id: {:?}", raw)))?;
    if id <= 0 {
        return Err(ServiceError::InvalidInput(format!(
            "Id must be positive, got {}",
            id
        )));
    }
    Ok(id)
}
