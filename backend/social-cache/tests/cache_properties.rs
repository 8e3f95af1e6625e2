//! Cache-layer behavior against the in-memory backend: read-through
//! idempotence, invalidation effectiveness, symmetric relationship pairs,
//! bulk pattern scope, and degradation under a store outage.

mod support;

use social_cache::cache::explore::{ExploreCache, ExplorePage};
use social_cache::cache::follow::FollowCache;
use social_cache::cache::likes::LikesCache;
use social_cache::cache::post::PostCache;
use social_cache::cache::user::UserCache;
use social_cache::config::CacheConfig;
use social_cache::models::PostSummary;
use social_cache::store::{CacheBackend, CacheStore, MemoryBackend};
use social_cache::keys;
use support::{init_tracing, sample_post, sample_user, FailingBackend};

fn memory_store() -> CacheStore<MemoryBackend> {
    init_tracing();
    CacheStore::new(MemoryBackend::new())
}

#[tokio::test]
async fn set_then_get_returns_equal_document() {
    let store = memory_store();
    let config = CacheConfig::default();

    let posts = PostCache::new(store.clone(), &config);
    let post = sample_post(42, 7);
    posts.set(&post).await;
    assert_eq!(posts.get(42).await, Some(post));

    let users = UserCache::new(store, &config);
    let user = sample_user(7);
    users.set(&user).await;
    assert_eq!(users.get(7).await, Some(user));
}

#[tokio::test]
async fn get_after_ttl_expiry_is_a_miss() {
    let store = memory_store();
    let config = CacheConfig {
        post_detail_ttl: 0,
        ..CacheConfig::default()
    };

    let posts = PostCache::new(store, &config);
    posts.set(&sample_post(1, 1)).await;
    assert_eq!(posts.get(1).await, None);
}

#[tokio::test]
async fn invalidate_then_get_is_a_miss() {
    let store = memory_store();
    let config = CacheConfig::default();

    let posts = PostCache::new(store.clone(), &config);
    posts.set(&sample_post(42, 7)).await;
    posts.invalidate(42).await;
    assert_eq!(posts.get(42).await, None);

    let users = UserCache::new(store, &config);
    users.set(&sample_user(7)).await;
    users.invalidate(7).await;
    assert_eq!(users.get(7).await, None);
}

#[tokio::test]
async fn user_invalidation_also_drops_subsidiary_posts_key() {
    let store = memory_store();
    let config = CacheConfig::default();
    let users = UserCache::new(store.clone(), &config);

    users.set(&sample_user(7)).await;
    store.set_string(&keys::user_posts(7), "[]", 86400).await;

    users.invalidate(7).await;

    assert_eq!(store.get_string(&keys::user_profile(7)).await, None);
    assert_eq!(store.get_string(&keys::user_posts(7)).await, None);
}

#[tokio::test]
async fn follow_pair_is_symmetric() {
    let follow = FollowCache::new(memory_store());

    follow.set_pair(1, 2).await;
    assert!(follow.following(1).await.contains(&2));
    assert!(follow.followers(2).await.contains(&1));

    follow.invalidate_pair(1, 2).await;
    assert!(!follow.following(1).await.contains(&2));
    assert!(!follow.followers(2).await.contains(&1));
}

#[tokio::test]
async fn likes_pair_is_symmetric() {
    let likes = LikesCache::new(memory_store());

    likes.set_pair(7, 42).await;
    assert!(likes.posts_liked_by(7).await.contains(&42));
    assert!(likes.likers_of_post(42).await.contains(&7));

    likes.invalidate_pair(7, 42).await;
    assert!(likes.posts_liked_by(7).await.is_empty());
    assert!(likes.likers_of_post(42).await.is_empty());
}

#[tokio::test]
async fn removing_absent_pair_is_a_noop() {
    let likes = LikesCache::new(memory_store());
    likes.invalidate_pair(7, 42).await;
    assert!(likes.posts_liked_by(7).await.is_empty());
}

#[tokio::test]
async fn membership_lists_preserve_insertion_order() {
    let follow = FollowCache::new(memory_store());
    follow.set_pair(1, 10).await;
    follow.set_pair(1, 20).await;
    follow.set_pair(1, 30).await;
    assert_eq!(follow.following(1).await, vec![10, 20, 30]);
}

#[tokio::test]
async fn explore_bulk_invalidation_matches_only_explore_keys() {
    let store = memory_store();
    let config = CacheConfig::default();
    let explore = ExploreCache::new(store.clone(), &config);

    let page = ExplorePage {
        count: 1,
        posts: vec![PostSummary::from(&sample_post(5, 3))],
    };
    explore.set(1, &page).await;
    explore.set(2, &page).await;
    store.set_string(&keys::user_profile(1), "{}", 86400).await;

    explore.invalidate_all().await;
    let deleted = explore.quiesce().await;

    assert_eq!(deleted, 2);
    assert_eq!(explore.get(1).await, None);
    assert_eq!(explore.get(2).await, None);
    // Non-explore keys are untouched.
    assert!(store.get_string(&keys::user_profile(1)).await.is_some());

    let remaining = store.backend().keys().await;
    assert_eq!(remaining, vec![keys::user_profile(1)]);
}

#[tokio::test]
async fn completed_bulk_invalidations_are_pruned() {
    let store = memory_store();
    let explore = ExploreCache::new(store, &CacheConfig::default());

    for _ in 0..25 {
        explore.invalidate_all().await;
    }
    // Let the spawned scans finish.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // The next invalidation prunes every completed handle before pushing
    // its own; only the in-flight scan remains retained.
    explore.invalidate_all().await;
    assert_eq!(explore.pending_count().await, 1);

    explore.quiesce().await;
    assert_eq!(explore.pending_count().await, 0);
}

#[tokio::test]
async fn explore_set_then_get_round_trips() {
    let store = memory_store();
    let explore = ExploreCache::new(store, &CacheConfig::default());

    let page = ExplorePage {
        count: 3,
        posts: vec![
            PostSummary::from(&sample_post(3, 9)),
            PostSummary::from(&sample_post(2, 8)),
        ],
    };
    explore.set(4, &page).await;
    assert_eq!(explore.get(4).await, Some(page));
}

#[tokio::test]
async fn malformed_cached_json_is_a_miss() {
    let store = memory_store();
    let config = CacheConfig::default();
    let posts = PostCache::new(store.clone(), &config);

    store
        .set_string(&keys::post_detail(9), "{not json", 86400)
        .await;
    assert_eq!(posts.get(9).await, None);
}

#[tokio::test]
async fn store_outage_degrades_every_component_to_misses() {
    let store = CacheStore::new(FailingBackend);
    let config = CacheConfig::default();

    let posts = PostCache::new(store.clone(), &config);
    posts.set(&sample_post(1, 1)).await;
    assert_eq!(posts.get(1).await, None);
    posts.invalidate(1).await;

    let users = UserCache::new(store.clone(), &config);
    users.set(&sample_user(1)).await;
    assert_eq!(users.get(1).await, None);
    users.invalidate(1).await;

    let likes = LikesCache::new(store.clone());
    likes.set_pair(1, 2).await;
    assert!(likes.posts_liked_by(1).await.is_empty());
    assert!(likes.likers_of_post(2).await.is_empty());
    likes.invalidate_pair(1, 2).await;

    let follow = FollowCache::new(store.clone());
    follow.set_pair(1, 2).await;
    assert!(follow.following(1).await.is_empty());
    follow.invalidate_pair(1, 2).await;

    let explore = ExploreCache::new(store, &config);
    assert_eq!(explore.get(1).await, None);
    explore
        .set(
            1,
            &ExplorePage {
                count: 0,
                posts: Vec::new(),
            },
        )
        .await;
    explore.invalidate_all().await;
    assert_eq!(explore.quiesce().await, 0);
}

#[tokio::test]
async fn store_outage_raw_adapter_contracts() {
    let store = CacheStore::new(FailingBackend);

    assert_eq!(store.get_string("post:1:detail").await, None);
    assert!(!store.set_string("post:1:detail", "{}", 60).await);
    assert!(!store.add_member("post:1:likes", 7, 1.0).await);
    assert!(!store.remove_member("post:1:likes", 7).await);
    assert!(store.list_members("post:1:likes").await.is_empty());
    assert!(!store.delete_key("post:1:detail").await);
    assert_eq!(
        store.delete_keys_by_pattern("*:explore").wait().await,
        0
    );
}

#[tokio::test]
async fn non_numeric_members_are_skipped() {
    let store = memory_store();
    store.backend().zadd("post:1:likes", "7", 1.0).await.unwrap();
    store
        .backend()
        .zadd("post:1:likes", "garbage", 2.0)
        .await
        .unwrap();
    assert_eq!(store.list_members("post:1:likes").await, vec![7]);
}
