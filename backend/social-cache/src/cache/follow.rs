//! Follow relationship cache.
//!
//! Symmetric pair of membership lists: who a user follows and who follows
//! them. Same storage contract as the likes cache — no TTL, sole store for
//! the relationship, two independent key writes per edge.

use super::insertion_score;
use crate::keys;
use crate::store::{CacheBackend, CacheStore};

pub struct FollowCache<B> {
    store: CacheStore<B>,
}

impl<B> Clone for FollowCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<B: CacheBackend + 'static> FollowCache<B> {
    pub fn new(store: CacheStore<B>) -> Self {
        Self { store }
    }

    /// Record that `follower_id` follows `followee_id` on both sides.
    pub async fn set_pair(&self, follower_id: i64, followee_id: i64) {
        let score = insertion_score();
        self.store
            .add_member(&keys::user_following(follower_id), followee_id, score)
            .await;
        self.store
            .add_member(&keys::user_followers(followee_id), follower_id, score)
            .await;
    }

    /// Users `user_id` follows, oldest follow first.
    pub async fn following(&self, user_id: i64) -> Vec<i64> {
        self.store.list_members(&keys::user_following(user_id)).await
    }

    /// Users following `user_id`, oldest follow first.
    pub async fn followers(&self, user_id: i64) -> Vec<i64> {
        self.store.list_members(&keys::user_followers(user_id)).await
    }

    /// Remove both sides of the edge. No-op if either side is already
    /// absent.
    pub async fn invalidate_pair(&self, follower_id: i64, followee_id: i64) {
        self.store
            .remove_member(&keys::user_following(follower_id), followee_id)
            .await;
        self.store
            .remove_member(&keys::user_followers(followee_id), follower_id)
            .await;
    }
}
