//! Like relationship cache.
//!
//! Two membership lists per edge, maintained as a symmetric pair: the
//! posts a user has liked and the users who liked a post. No TTL and no
//! relational fallback — these lists are the relationship's only store.

use super::insertion_score;
use crate::keys;
use crate::store::{CacheBackend, CacheStore};

pub struct LikesCache<B> {
    store: CacheStore<B>,
}

impl<B> Clone for LikesCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<B: CacheBackend + 'static> LikesCache<B> {
    pub fn new(store: CacheStore<B>) -> Self {
        Self { store }
    }

    /// Record that `user_id` likes `post_id` on both sides of the pair.
    ///
    /// The two list writes are independent key mutations; a crash between
    /// them leaves an asymmetric edge. There is no cross-key transaction
    /// and no automatic repair.
    pub async fn set_pair(&self, user_id: i64, post_id: i64) {
        let score = insertion_score();
        self.store
            .add_member(&keys::user_post_likes(user_id), post_id, score)
            .await;
        self.store
            .add_member(&keys::post_likes(post_id), user_id, score)
            .await;
    }

    /// Users who liked the post, oldest like first.
    pub async fn likers_of_post(&self, post_id: i64) -> Vec<i64> {
        self.store.list_members(&keys::post_likes(post_id)).await
    }

    /// Posts the user has liked, oldest like first.
    pub async fn posts_liked_by(&self, user_id: i64) -> Vec<i64> {
        self.store.list_members(&keys::user_post_likes(user_id)).await
    }

    /// Remove both sides of the edge. No-op if either side is already
    /// absent.
    pub async fn invalidate_pair(&self, user_id: i64, post_id: i64) {
        self.store
            .remove_member(&keys::user_post_likes(user_id), post_id)
            .await;
        self.store
            .remove_member(&keys::post_likes(post_id), user_id)
            .await;
    }
}
