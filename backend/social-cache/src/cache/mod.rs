//! Cache components.
//!
//! Entity caches ([`post`], [`user`]) are cache-aside snapshots of the
//! relational store with fixed TTLs and explicit invalidation. Relationship
//! caches ([`likes`], [`follow`]) hold symmetric membership-list pairs and
//! are the only store for those relationships. The [`explore`] cache is a
//! per-viewer first-page listing, invalidated in bulk by key pattern.

pub mod explore;
pub mod follow;
pub mod likes;
pub mod post;
pub mod user;

use chrono::Utc;

/// Insertion score for membership lists: wall-clock epoch millis, so list
/// order follows insertion order.
pub(crate) fn insertion_score() -> f64 {
    Utc::now().timestamp_millis() as f64
}
