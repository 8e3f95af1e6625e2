//! User write paths: profile updates and the follow/unfollow edges.

use crate::cache::explore::ExploreCache;
use crate::cache::follow::FollowCache;
use crate::cache::user::UserCache;
use crate::config::CacheConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{ProfileUpdate, User};
use crate::repository::Repository;
use crate::store::{CacheBackend, CacheStore};
use std::sync::Arc;

pub struct UserService<B, R> {
    repo: Arc<R>,
    users: UserCache<B>,
    follow: FollowCache<B>,
    explore: ExploreCache<B>,
}

impl<B, R> UserService<B, R>
where
    B: CacheBackend + 'static,
    R: Repository,
{
    pub fn new(repo: Arc<R>, store: CacheStore<B>, config: &CacheConfig) -> Self {
        Self {
            repo,
            users: UserCache::new(store.clone(), config),
            follow: FollowCache::new(store.clone()),
            explore: ExploreCache::new(store, config),
        }
    }

    /// Cache-aside profile read.
    pub async fn get_user(&self, user_id: i64) -> ServiceResult<User> {
        if let Some(cached) = self.users.get(user_id).await {
            return Ok(cached);
        }

        let user = self
            .repo
            .user_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        self.users.set(&user).await;
        Ok(user)
    }

    /// Update profile fields, then invalidate the profile document (and its
    /// subsidiary keys) before returning to the writer.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: ProfileUpdate,
    ) -> ServiceResult<User> {
        let user = self.repo.update_user(user_id, update).await?;
        self.users.invalidate(user_id).await;
        Ok(user)
    }

    /// Follow another user. Double-follow is rejected by a membership check
    /// against the follower's outgoing list before the pair write.
    pub async fn follow(&self, follower_id: i64, followee_id: i64) -> ServiceResult<()> {
        if follower_id == followee_id {
            return Err(ServiceError::InvalidInput(
                "Cannot follow yourself.".into(),
            ));
        }

        self.repo
            .user_by_id(followee_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", followee_id)))?;

        if self
            .follow
            .following(follower_id)
            .await
            .contains(&followee_id)
        {
            return Err(ServiceError::AlreadyExists(
                "Already following this user.".into(),
            ));
        }

        self.follow.set_pair(follower_id, followee_id).await;

        // Following an author removes their posts from the viewer's explore
        // set, and the membership change can ripple into other viewers'
        // pages too.
        self.explore.invalidate_all().await;
        Ok(())
    }

    /// Unfollow; the true inverse of [`follow`](Self::follow).
    pub async fn unfollow(&self, follower_id: i64, followee_id: i64) -> ServiceResult<()> {
        if !self
            .follow
            .following(follower_id)
            .await
            .contains(&followee_id)
        {
            return Err(ServiceError::InvalidInput(
                "Not following this user.".into(),
            ));
        }

        self.follow.invalidate_pair(follower_id, followee_id).await;
        self.explore.invalidate_all().await;
        Ok(())
    }

    pub async fn followers(&self, user_id: i64) -> Vec<i64> {
        self.follow.followers(user_id).await
    }

    pub async fn following(&self, user_id: i64) -> Vec<i64> {
        self.follow.following(user_id).await
    }

    /// Await in-flight explore bulk invalidations (tests and shutdown).
    pub async fn quiesce_invalidations(&self) -> u64 {
        self.explore.quiesce().await
    }
}
