//! Post write paths: CRUD invalidation sequences, like/unlike idempotence,
//! and the explore feed's first-page caching.

use crate::broadcast::{NotificationEvent, NotificationHub, NotificationKind};
use crate::cache::explore::{ExploreCache, ExplorePage};
use crate::cache::follow::FollowCache;
use crate::cache::likes::LikesCache;
use crate::cache::post::PostCache;
use crate::cache::user::UserCache;
use crate::config::CacheConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewPost, Post, PostSummary, PostUpdate};
use crate::repository::Repository;
use crate::store::{CacheBackend, CacheStore};
use std::sync::Arc;
use tracing::debug;

pub struct PostService<B, R> {
    repo: Arc<R>,
    hub: Arc<NotificationHub>,
    posts: PostCache<B>,
    likes: LikesCache<B>,
    users: UserCache<B>,
    follow: FollowCache<B>,
    explore: ExploreCache<B>,
}

impl<B, R> PostService<B, R>
where
    B: CacheBackend + 'static,
    R: Repository,
{
    pub fn new(
        repo: Arc<R>,
        hub: Arc<NotificationHub>,
        store: CacheStore<B>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            repo,
            hub,
            posts: PostCache::new(store.clone(), config),
            likes: LikesCache::new(store.clone()),
            users: UserCache::new(store.clone(), config),
            follow: FollowCache::new(store.clone()),
            explore: ExploreCache::new(store, config),
        }
    }

    /// Cache-aside read: serve the cached detail document, otherwise fetch
    /// from persistence and repopulate.
    pub async fn get_post(&self, post_id: i64) -> ServiceResult<Post> {
        if let Some(cached) = self.posts.get(post_id).await {
            return Ok(cached);
        }

        let post = self
            .repo
            .post_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", post_id)))?;

        self.posts.set(&post).await;
        Ok(post)
    }

    pub async fn create_post(&self, new: NewPost) -> ServiceResult<Post> {
        if new.content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Content is required.".into()));
        }

        let post = self.repo.create_post(new).await?;

        // The author's subsidiary posts listing changed, and the new post
        // may enter any viewer's explore page.
        self.users.invalidate(post.user_id).await;
        self.explore.invalidate_all().await;

        self.hub.notify(NotificationEvent::new(
            NotificationKind::CreatePost,
            post.user_id,
            post.id,
        ));
        Ok(post)
    }

    /// Update a post's content. Invalidation order after the persistence
    /// write: detail key, then the author's subsidiary keys, then the
    /// explore bulk pattern. Each call is independently best-effort; a
    /// failed invalidation leaves a stale entry bounded by TTL, never a
    /// failed request.
    pub async fn update_post(
        &self,
        editor_id: i64,
        post_id: i64,
        update: PostUpdate,
    ) -> ServiceResult<Post> {
        if update.content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Content is required.".into()));
        }

        let existing = self
            .repo
            .post_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", post_id)))?;
        if existing.user_id != editor_id {
            return Err(ServiceError::Forbidden(
                "Only the author can update this post.".into(),
            ));
        }

        let post = self.repo.update_post(post_id, update).await?;

        self.posts.invalidate(post_id).await;
        self.users.invalidate(existing.user_id).await;
        self.explore.invalidate_all().await;

        Ok(post)
    }

    /// Delete a post. Same invalidation sequence as update.
    pub async fn delete_post(&self, editor_id: i64, post_id: i64) -> ServiceResult<()> {
        let existing = self
            .repo
            .post_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", post_id)))?;
        if existing.user_id != editor_id {
            return Err(ServiceError::Forbidden(
                "Only the author can delete this post.".into(),
            ));
        }

        self.repo.delete_post(post_id).await?;

        self.posts.invalidate(post_id).await;
        self.users.invalidate(existing.user_id).await;
        self.explore.invalidate_all().await;

        self.hub.notify(NotificationEvent::new(
            NotificationKind::DeletePost,
            editor_id,
            post_id,
        ));
        Ok(())
    }

    /// Like a post. The membership list is the source of truth, so the
    /// no-double-like rule is a read-before-write check here; the cache
    /// call itself is unconditional.
    pub async fn like_post(&self, user_id: i64, post_id: i64) -> ServiceResult<()> {
        self.repo
            .post_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", post_id)))?;

        if self.likes.posts_liked_by(user_id).await.contains(&post_id) {
            return Err(ServiceError::AlreadyExists("Post already liked.".into()));
        }

        self.likes.set_pair(user_id, post_id).await;
        Ok(())
    }

    /// Unlike a post; the true inverse of [`like_post`](Self::like_post).
    pub async fn unlike_post(&self, user_id: i64, post_id: i64) -> ServiceResult<()> {
        if !self.likes.posts_liked_by(user_id).await.contains(&post_id) {
            return Err(ServiceError::InvalidInput("Post is not liked.".into()));
        }

        self.likes.invalidate_pair(user_id, post_id).await;
        Ok(())
    }

    pub async fn post_likers(&self, post_id: i64) -> Vec<i64> {
        self.likes.likers_of_post(post_id).await
    }

    pub async fn liked_posts(&self, user_id: i64) -> Vec<i64> {
        self.likes.posts_liked_by(user_id).await
    }

    /// Explore feed: posts from authors the viewer neither is nor follows,
    /// newest first. Only the first page (offset 0) touches the cache;
    /// every other offset is computed live.
    pub async fn explore_feed(
        &self,
        viewer_id: i64,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<ExplorePage> {
        if limit <= 0 {
            return Err(ServiceError::InvalidInput("Limit must be positive.".into()));
        }
        if offset < 0 {
            return Err(ServiceError::InvalidInput(
                "Offset cannot be negative.".into(),
            ));
        }

        let first_page = offset == 0;
        if first_page {
            if let Some(page) = self.explore.get(viewer_id).await {
                debug!("explore cache hit for viewer {}", viewer_id);
                return Ok(page);
            }
        }

        let mut exclude = self.follow.following(viewer_id).await;
        exclude.push(viewer_id);

        let count = self.repo.explore_count(&exclude).await?;
        let posts: Vec<PostSummary> = self.repo.explore_posts(&exclude, limit, offset).await?;
        let page = ExplorePage { count, posts };

        if first_page {
            self.explore.set(viewer_id, &page).await;
        }
        Ok(page)
    }

    /// Await in-flight explore bulk invalidations. Write paths never wait
    /// on these; tests and shutdown do.
    pub async fn quiesce_invalidations(&self) -> u64 {
        self.explore.quiesce().await
    }
}
