//! Cache key builders.
//!
//! Every key follows the `{entity}:{id}:{facet}` pattern. Entity prefixes are
//! disjoint, so keys never collide across kinds. Builders are pure: the same
//! id always yields the same key, across restarts, with ids rendered in
//! plain decimal form.

/// Glob matching every viewer's explore cache entry.
pub const EXPLORE_PATTERN: &str = "*:explore";

pub fn post_detail(post_id: i64) -> String {
    format!("post:{}:detail", post_id)
}

pub fn post_likes(post_id: i64) -> String {
    format!("post:{}:likes", post_id)
}

pub fn user_post_likes(user_id: i64) -> String {
    format!("user:{}:post_likes", user_id)
}

pub fn user_profile(user_id: i64) -> String {
    format!("user:{}:profile", user_id)
}

pub fn user_posts(user_id: i64) -> String {
    format!("user:{}:posts", user_id)
}

pub fn user_followers(user_id: i64) -> String {
    format!("user:{}:followers", user_id)
}

pub fn user_following(user_id: i64) -> String {
    format!("user:{}:following", user_id)
}

pub fn user_explore(user_id: i64) -> String {
    format!("user:{}:explore", user_id)
}
