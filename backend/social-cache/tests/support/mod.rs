#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use social_cache::error::{CacheError, ServiceError, ServiceResult};
use social_cache::models::{Comment, NewPost, Post, PostSummary, PostUpdate, ProfileUpdate, User};
use social_cache::repository::Repository;
use social_cache::store::CacheBackend;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Once;
use tokio::sync::Mutex;

static TRACING: Once = Once::new();

/// Install the log subscriber once per test binary so degraded cache calls
/// show their warnings under `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn sample_post(id: i64, user_id: i64) -> Post {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id);
    Post {
        id,
        user_id,
        content: format!("post {}", id),
        image: None,
        total_likes: 0,
        total_comments: 0,
        created_at: created,
        updated_at: created,
    }
}

pub fn sample_user(id: i64) -> User {
    User {
        id,
        email: format!("user{}@example.com", id),
        username: format!("user{}", id),
        full_name: format!("User {}", id),
        avatar: None,
        bio: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Relational store double. Counts explore page queries so tests can tell
/// cache hits from source-of-truth reads.
#[derive(Default)]
pub struct MemoryRepository {
    posts: Mutex<HashMap<i64, Post>>,
    users: Mutex<HashMap<i64, User>>,
    comments: Mutex<HashMap<i64, Comment>>,
    next_id: AtomicI64,
    pub explore_queries: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub async fn seed_post(&self, post: Post) {
        self.posts.lock().await.insert(post.id, post);
    }

    pub async fn seed_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    pub fn explore_query_count(&self) -> usize {
        self.explore_queries.load(Ordering::SeqCst)
    }

    fn alloc_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn post_by_id(&self, id: i64) -> ServiceResult<Option<Post>> {
        Ok(self.posts.lock().await.get(&id).cloned())
    }

    async fn user_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn create_post(&self, new: NewPost) -> ServiceResult<Post> {
        let id = self.alloc_id();
        let mut post = sample_post(id, new.user_id);
        post.content = new.content;
        post.image = new.image;
        let created = Utc::now();
        post.created_at = created;
        post.updated_at = created;
        self.posts.lock().await.insert(id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: i64, update: PostUpdate) -> ServiceResult<Post> {
        let mut posts = self.posts.lock().await;
        let post = posts
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("Post {} not found", id)))?;
        post.content = update.content;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> ServiceResult<()> {
        self.posts.lock().await.remove(&id);
        Ok(())
    }

    async fn update_user(&self, id: i64, update: ProfileUpdate) -> ServiceResult<User> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if update.avatar.is_some() {
            user.avatar = update.avatar;
        }
        if update.bio.is_some() {
            user.bio = update.bio;
        }
        Ok(user.clone())
    }

    async fn explore_posts(
        &self,
        exclude_authors: &[i64],
        limit: i64,
        offset: i64,
    ) -> ServiceResult<Vec<PostSummary>> {
        self.explore_queries.fetch_add(1, Ordering::SeqCst);
        let posts = self.posts.lock().await;
        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|p| !exclude_authors.contains(&p.user_id))
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(PostSummary::from)
            .collect())
    }

    async fn explore_count(&self, exclude_authors: &[i64]) -> ServiceResult<i64> {
        let posts = self.posts.lock().await;
        Ok(posts
            .values()
            .filter(|p| !exclude_authors.contains(&p.user_id))
            .count() as i64)
    }

    async fn create_comment(
        &self,
        post_id: i64,
        user_id: i64,
        content: &str,
    ) -> ServiceResult<Comment> {
        let id = self.alloc_id();
        let comment = Comment {
            id,
            post_id,
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.comments.lock().await.insert(id, comment.clone());
        if let Some(post) = self.posts.lock().await.get_mut(&post_id) {
            post.total_comments += 1;
        }
        Ok(comment)
    }

    async fn comment_by_id(&self, id: i64) -> ServiceResult<Option<Comment>> {
        Ok(self.comments.lock().await.get(&id).cloned())
    }

    async fn delete_comment(&self, id: i64) -> ServiceResult<()> {
        if let Some(comment) = self.comments.lock().await.remove(&id) {
            if let Some(post) = self.posts.lock().await.get_mut(&comment.post_id) {
                post.total_comments -= 1;
            }
        }
        Ok(())
    }
}

/// Backend where every call fails, simulating a store outage.
pub struct FailingBackend;

fn outage<T>() -> Result<T, CacheError> {
    Err(CacheError::Backend("store unavailable".to_string()))
}

#[async_trait]
impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        outage()
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> Result<(), CacheError> {
        outage()
    }

    async fn zadd(&self, _key: &str, _member: &str, _score: f64) -> Result<(), CacheError> {
        outage()
    }

    async fn zrem(&self, _key: &str, _member: &str) -> Result<(), CacheError> {
        outage()
    }

    async fn zrange_members(&self, _key: &str) -> Result<Vec<String>, CacheError> {
        outage()
    }

    async fn del(&self, _key: &str) -> Result<(), CacheError> {
        outage()
    }

    async fn scan_delete(&self, _pattern: &str) -> Result<u64, CacheError> {
        outage()
    }
}
