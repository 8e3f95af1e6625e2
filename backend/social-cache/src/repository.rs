//! Persistence boundary.
//!
//! The relational store is an external collaborator: this crate only reads
//! point lookups, counts, and paged listings from it, and triggers cache
//! invalidation after the orchestrator's writes succeed. Relationship
//! membership (likes, follows) has no relational counterpart; the cache
//! layer is its only store.

use crate::error::ServiceResult;
use crate::models::{Comment, NewPost, Post, PostSummary, PostUpdate, ProfileUpdate, User};
use async_trait::async_trait;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn post_by_id(&self, id: i64) -> ServiceResult<Option<Post>>;
    async fn user_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    async fn create_post(&self, new: NewPost) -> ServiceResult<Post>;
    async fn update_post(&self, id: i64, update: PostUpdate) -> ServiceResult<Post>;
    async fn delete_post(&self, id: i64) -> ServiceResult<()>;

    async fn update_user(&self, id: i64, update: ProfileUpdate) -> ServiceResult<User>;

    /// Posts by authors outside the exclusion set, newest first, paged with
    /// skip/take.
    async fn explore_posts(
        &self,
        exclude_authors: &[i64],
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PostSummary>>;

    /// Total count matching the same exclusion set.
    async fn explore_count(&self, exclude_authors: &[i64]) -> ServiceResult<i64>;

    async fn create_comment(&self, post_id: i64, user_id: i64, content: &str)
        -> ServiceResult<Comment>;
    async fn comment_by_id(&self, id: i64) -> ServiceResult<Option<Comment>>;
    async fn delete_comment(&self, id: i64) -> ServiceResult<()>;
}
