//! Comment write paths.
//!
//! Comment counts ride on the post detail document, so every comment
//! mutation invalidates the post's detail key after the persistence write.

use crate::broadcast::{NotificationEvent, NotificationHub, NotificationKind};
use crate::cache::post::PostCache;
use crate::config::CacheConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::Comment;
use crate::repository::Repository;
use crate::services::parse_id;
use crate::store::{CacheBackend, CacheStore};
use std::sync::Arc;

pub struct CommentService<B, R> {
    repo: Arc<R>,
    hub: Arc<NotificationHub>,
    posts: PostCache<B>,
}

impl<B, R> CommentService<B, R>
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
            posts: PostCache::new(store, config),
        }
    }

    /// Create a comment. `raw_post_id` comes straight from the request
    /// path and is validated here rather than coerced.
    pub async fn create_comment(
        &self,
        user_id: i64,
        raw_post_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        let post_id = parse_id(raw_post_id)?;
        if content.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Content is required.".into()));
        }

        self.repo
            .post_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", post_id)))?;

        let comment = self.repo.create_comment(post_id, user_id, content).await?;

        self.posts.invalidate(post_id).await;

        self.hub.notify(NotificationEvent::new(
            NotificationKind::CreateComment,
            user_id,
            post_id,
        ));
        Ok(comment)
    }

    pub async fn delete_comment(&self, user_id: i64, raw_comment_id: &str) -> ServiceResult<()> {
        let comment_id = parse_id(raw_comment_id)?;

        let comment = self
            .repo
            .comment_by_id(comment_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Comment {} not found", comment_id)))?;
        if comment.user_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the author can delete this comment.".into(),
            ));
        }

        self.repo.delete_comment(comment_id).await?;

        self.posts.invalidate(comment.post_id).await;

        self.hub.notify(NotificationEvent::new(
            NotificationKind::DeleteComment,
            user_id,
            comment.post_id,
        ));
        Ok(())
    }
}
