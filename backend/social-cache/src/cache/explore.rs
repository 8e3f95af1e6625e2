//! Explore feed cache.
//!
//! Per-viewer composite entry (total count + first page of posts) with a
//! short TTL. Only page offset 0 is ever cached; deeper pages are always
//! computed live. Any post write or follow change anywhere invalidates
//! every viewer's entry in bulk, because the orchestrator cannot cheaply
//! tell whose explore set changed. Precision is traded for correctness.

use crate::config::CacheConfig;
use crate::keys;
use crate::models::PostSummary;
use crate::store::{CacheBackend, CacheStore, PatternDelete};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorePage {
    pub count: i64,
    pub posts: Vec<PostSummary>,
}

pub struct ExploreCache<B> {
    store: CacheStore<B>,
    ttl: u64,
    pending: Arc<Mutex<Vec<PatternDelete>>>,
}

impl<B> Clone for ExploreCache<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ttl: self.ttl,
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<B: CacheBackend + 'static> ExploreCache<B> {
    pub fn new(store: CacheStore<B>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.explore_ttl,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Cached first page for the viewer, if present.
    pub async fn get(&self, viewer_id: i64) -> Option<ExplorePage> {
        self.store.get_json(&keys::user_explore(viewer_id)).await
    }

    pub async fn set(&self, viewer_id: i64, page: &ExplorePage) {
        self.store
            .set_json(&keys::user_explore(viewer_id), page, self.ttl)
            .await;
    }

    /// Drop every viewer's explore entry.
    ///
    /// The scan runs on a background task; write paths fire and forget,
    /// while [`quiesce`](Self::quiesce) lets tests await completion. The
    /// handle is retained so no scan is dropped mid-flight; handles whose
    /// scan already completed are pruned here, so the pending set stays
    /// bounded by the number of in-flight scans, not the write rate.
    pub async fn invalidate_all(&self) {
        let task = self.store.delete_keys_by_pattern(keys::EXPLORE_PATTERN);
        let mut pending = self.pending.lock().await;
        pending.retain(|t| !t.is_finished());
        pending.push(task);
    }

    /// Number of retained bulk-invalidation handles.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Await every in-flight bulk invalidation; returns total keys deleted.
    pub async fn quiesce(&self) -> u64 {
        let tasks: Vec<PatternDelete> = self.pending.lock().await.drain(..).collect();
        let mut deleted = 0;
        for task in tasks {
            deleted += task.wait().await;
        }
        deleted
    }
}
