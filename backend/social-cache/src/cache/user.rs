//! User profile cache.

use crate::config::CacheConfig;
use crate::keys;
use crate::models::User;
use crate::store::{CacheBackend, CacheStore};

pub struct UserCache<B> {
    store: CacheStore<B>,
    ttl: u64,
}

impl<B> Clone for UserCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl: self.ttl,
        }
    }
}

impl<B: CacheBackend + 'static> UserCache<B> {
    pub fn new(store: CacheStore<B>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.user_profile_ttl,
        }
    }

    pub async fn set(&self, user: &User) {
        self.store
            .set_json(&keys::user_profile(user.id), user, self.ttl)
            .await;
    }

    pub async fn get(&self, user_id: i64) -> Option<User> {
        self.store.get_json(&keys::user_profile(user_id)).await
    }

    /// Drop the profile document and the subsidiary per-user posts listing.
    /// The subsidiary key set is fixed for the user kind; both deletes run
    /// even if one fails.
    pub async fn invalidate(&self, user_id: i64) {
        self.store.delete_key(&keys::user_profile(user_id)).await;
        self.store.delete_key(&keys::user_posts(user_id)).await;
    }
}
