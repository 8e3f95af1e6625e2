//! Post detail cache.

use crate::config::CacheConfig;
use crate::keys;
use crate::models::Post;
use crate::store::{CacheBackend, CacheStore};
use tracing::debug;

pub struct PostCache<B> {
    store: CacheStore<B>,
    ttl: u64,
}

impl<B> Clone for PostCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl: self.ttl,
        }
    }
}

impl<B: CacheBackend + 'static> PostCache<B> {
    pub fn new(store: CacheStore<B>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.post_detail_ttl,
        }
    }

    /// Cache a post detail snapshot. Failures are logged by the store and
    /// swallowed here; a post that fails to cache is simply recomputed on
    /// the next read.
    pub async fn set(&self, post: &Post) {
        self.store
            .set_json(&keys::post_detail(post.id), post, self.ttl)
            .await;
    }

    /// Serve a cached post if present. Read-through population on miss is
    /// the orchestrator's job, not this component's.
    pub async fn get(&self, post_id: i64) -> Option<Post> {
        let post = self.store.get_json(&keys::post_detail(post_id)).await;
        if post.is_some() {
            debug!("post cache hit for {}", post_id);
        }
        post
    }

    /// Drop the cached detail document. Must run after every write to the
    /// post's persisted fields, before the writer's response goes out.
    pub async fn invalidate(&self, post_id: i64) {
        self.store.delete_key(&keys::post_detail(post_id)).await;
    }
}
