//! Cache-consistency layer for the social backend.
//!
//! Read-through entity caches (post detail, user profile) with fixed TTLs,
//! symmetric membership-list caches for likes and follows, a per-viewer
//! explore feed cache invalidated in bulk by key pattern, and the write-path
//! orchestrators that sequence persistence writes with cache invalidation.
//!
//! The cache is best-effort everywhere except the relationship lists, which
//! are the sole store for their edges: a store outage degrades reads to
//! misses and writes to no-ops, never a failed request.

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use broadcast::{NotificationEvent, NotificationHub, NotificationKind};
pub use cache::explore::{ExploreCache, ExplorePage};
pub use cache::follow::FollowCache;
pub use cache::likes::LikesCache;
pub use cache::post::PostCache;
pub use cache::user::UserCache;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, ServiceError, ServiceResult};
pub use repository::Repository;
pub use services::{parse_id, CommentService, PostService, UserService};
pub use store::{CacheBackend, CacheStore, MemoryBackend, PatternDelete, RedisBackend};
