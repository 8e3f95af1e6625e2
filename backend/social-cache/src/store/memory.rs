//! In-process implementation of the raw cache backend.
//!
//! Backs the test suite and single-node deployments that run without a
//! Redis server. TTL handling is lazy: an expired entry is dropped on the
//! read that finds it.

use super::CacheBackend;
use crate::error::CacheError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct StringEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl StringEntry {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    strings: RwLock<HashMap<String, StringEntry>>,
    // Membership lists kept sorted by ascending score.
    lists: RwLock<HashMap<String, Vec<(f64, String)>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// All live keys, for test assertions about pattern invalidation scope.
    pub async fn keys(&self) -> Vec<String> {
        let strings = self.strings.read().await;
        let lists = self.lists.read().await;
        let mut keys: Vec<String> = strings
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(k, _)| k.clone())
            .collect();
        keys.extend(lists.keys().cloned());
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock so expired entries can be dropped in place.
        let mut strings = self.strings.write().await;
        match strings.get(key) {
            Some(entry) if entry.is_expired() => {
                strings.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut strings = self.strings.write().await;
        strings.insert(
            key.to_string(),
            StringEntry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn zadd(&self, key: &str, member: &str, score: f64) -> Result<(), CacheError> {
        let mut lists = self.lists.write().await;
        let list = lists.entry(key.to_string()).or_default();
        list.retain(|(_, m)| m != member);
        list.push((score, member.to_string()));
        list.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> Result<(), CacheError> {
        let mut lists = self.lists.write().await;
        if let Some(list) = lists.get_mut(key) {
            list.retain(|(_, m)| m != member);
            if list.is_empty() {
                lists.remove(key);
            }
        }
        Ok(())
    }

    async fn zrange_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let lists = self.lists.read().await;
        Ok(lists
            .get(key)
            .map(|list| list.iter().map(|(_, m)| m.clone()).collect())
            .unwrap_or_default())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.strings.write().await.remove(key);
        self.lists.write().await.remove(key);
        Ok(())
    }

    async fn scan_delete(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut deleted = 0;
        {
            let mut strings = self.strings.write().await;
            let matches: Vec<String> = strings
                .keys()
                .filter(|k| glob_match(pattern, k))
                .cloned()
                .collect();
            for key in matches {
                strings.remove(&key);
                deleted += 1;
            }
        }
        {
            let mut lists = self.lists.write().await;
            let matches: Vec<String> = lists
                .keys()
                .filter(|k| glob_match(pattern, k))
                .cloned()
                .collect();
            for key in matches {
                lists.remove(&key);
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

/// Minimal glob matcher supporting `*` and `?`, the subset Redis MATCH uses
/// for cache invalidation patterns here.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    matches_at(&p, &t)
}

fn matches_at(pattern: &[char], text: &[char]) -> bool {
    match pattern.first() {
        None => text.is_empty(),
        Some('*') => {
            // `*` matches any run, including empty.
            (0..=text.len()).any(|skip| matches_at(&pattern[1..], &text[skip..]))
        }
        Some('?') => !text.is_empty() && matches_at(&pattern[1..], &text[1..]),
        Some(c) => text.first() == Some(c) && matches_at(&pattern[1..], &text[1..]),
    }
}
