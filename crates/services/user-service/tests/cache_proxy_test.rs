//! Cache-aside behaviour over the real directory service, in-memory backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use tokio_test::{assert_err, assert_ok};

use common::{AppError, AppResult};
use domain::{CreateUser, User};

use user_service_lib::infra::{CacheStore, InMemoryCache};
use user_service_lib::observability::CacheMetrics;
use user_service_lib::repository::{InMemoryUserRepository, UserRepository};
use user_service_lib::service::cache_proxy::{list_key, user_key};
use user_service_lib::service::{CachedUserService, UserManager, UserService};

const TTL: Duration = Duration::from_secs(15 * 60);

/// Counts the calls that get past the cache.
struct CountingService {
    inner: UserManager,
    lists: AtomicUsize,
    gets: AtomicUsize,
}

impl CountingService {
    fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserService for CountingService {
    async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_users(offset, limit).await
    }

    async fn get_user(&self, email: &str) -> AppResult<User> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user(email).await
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<i32> {
        self.inner.create_user(input).await
    }
}

/// Cache whose backend is always down.
struct UnreachableCache;

#[async_trait]
impl CacheStore for UnreachableCache {
    async fn get(&self, _key: &str) -> AppResult<Option<Vec<u8>>> {
        Err(AppError::service_unavailable("cache: connection refused"))
    }

    async fn set_ex(&self, _key: &str, _value: &[u8], _ttl: Duration) -> AppResult<()> {
        Err(AppError::service_unavailable("cache: connection refused"))
    }
}

/// Holds every listing until two callers are in flight at once.
struct GatedService {
    inner: UserManager,
    gate: Barrier,
    lists: AtomicUsize,
}

#[async_trait]
impl UserService for GatedService {
    async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.gate.wait().await;
        self.inner.list_users(offset, limit).await
    }

    async fn get_user(&self, email: &str) -> AppResult<User> {
        self.inner.get_user(email).await
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<i32> {
        self.inner.create_user(input).await
    }
}

/// In-memory cache that counts write-backs.
struct CountingCache {
    inner: InMemoryCache,
    writes: AtomicUsize,
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_ex(key, value, ttl).await
    }
}

struct Harness {
    repo: InMemoryUserRepository,
    spy: Arc<CountingService>,
    cache: InMemoryCache,
    users: CachedUserService,
}

fn harness() -> Harness {
    let repo = InMemoryUserRepository::new();
    let spy = Arc::new(CountingService {
        inner: UserManager::new(Arc::new(repo.clone())),
        lists: AtomicUsize::new(0),
        gets: AtomicUsize::new(0),
    });
    let cache = InMemoryCache::new();
    let users = CachedUserService::new(
        spy.clone(),
        Arc::new(cache.clone()),
        TTL,
        CacheMetrics::new(),
    );

    Harness {
        repo,
        spy,
        cache,
        users,
    }
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password: "s3cret".to_string(),
        name: "Test User".to_string(),
        age: 30,
    }
}

async fn seed(h: &Harness, emails: &[&str]) {
    for email in emails {
        h.repo.create(new_user(email)).await.unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_list_is_cached_under_offset_limit_key() {
    let h = harness();
    seed(&h, &["a@example.com", "b@example.com", "c@example.com"]).await;

    let users = assert_ok!(h.users.list_users(0, 5).await);

    assert_eq!(users.len(), 3);
    assert_eq!(h.cache.ttl_remaining("0:5").await, Some(TTL));
}

#[tokio::test]
async fn test_second_identical_call_is_served_from_cache() {
    let h = harness();
    seed(&h, &["a@example.com", "b@example.com"]).await;

    let first = h.users.list_users(0, 10).await.unwrap();
    let second = h.users.list_users(0, 10).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.spy.lists(), 1);

    // A different page is a different key
    h.users.list_users(1, 10).await.unwrap();
    assert_eq!(h.spy.lists(), 2);
}

#[tokio::test]
async fn test_point_lookup_is_cached_by_email() {
    let h = harness();
    seed(&h, &["ada@example.com"]).await;

    let first = h.users.get_user("ada@example.com").await.unwrap();
    let second = h.users.get_user("ada@example.com").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.spy.gets(), 1);
    assert!(h.cache.ttl_remaining(&user_key("ada@example.com")).await.is_some());
}

#[tokio::test]
async fn test_create_does_not_invalidate_cached_pages() {
    let h = harness();
    seed(&h, &["a@example.com"]).await;
    let before = h.users.list_users(0, 10).await.unwrap();

    h.users
        .create_user(new_user("late@example.com"))
        .await
        .unwrap();

    // Stale until the entry expires
    let after = h.users.list_users(0, 10).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(after.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_page_refreshes_after_ttl() {
    let h = harness();
    seed(&h, &["a@example.com"]).await;
    h.users.list_users(0, 10).await.unwrap();

    h.users
        .create_user(new_user("late@example.com"))
        .await
        .unwrap();

    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    assert_eq!(h.users.list_users(0, 10).await.unwrap().len(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(h.users.list_users(0, 10).await.unwrap().len(), 2);
    assert_eq!(h.spy.lists(), 2);
}

#[tokio::test]
async fn test_missing_user_is_not_cached() {
    let h = harness();

    let err = h.users.get_user("missing@example.com").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(h.cache.is_empty().await);

    // No negative caching: the next call asks again
    assert_err!(h.users.get_user("missing@example.com").await);
    assert_eq!(h.spy.gets(), 2);
}

#[tokio::test]
async fn test_invalid_limit_never_reaches_service() {
    let h = harness();

    for limit in [0, -5] {
        let err = h.users.list_users(0, limit).await.unwrap_err();
        assert!(err.is_invalid_argument());
    }

    assert_eq!(h.spy.lists(), 0);
    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_round_trip_before_cache_population() {
    let h = harness();

    let id = h
        .users
        .create_user(new_user("ada@example.com"))
        .await
        .unwrap();
    let user = h.users.get_user("ada@example.com").await.unwrap();

    assert_eq!(
        user,
        User {
            id,
            email: "ada@example.com".to_string(),
            password: "s3cret".to_string(),
            name: "Test User".to_string(),
            age: 30,
        }
    );
}

#[tokio::test]
async fn test_cache_hit_matches_miss_result() {
    let h = harness();
    seed(&h, &["ada@example.com"]).await;

    let from_service = h.users.get_user("ada@example.com").await.unwrap();
    let from_cache = h.users.get_user("ada@example.com").await.unwrap();

    assert_eq!(from_service, from_cache);
}

#[tokio::test]
async fn test_corrupted_entry_fails_the_read() {
    let h = harness();
    seed(&h, &["a@example.com"]).await;
    h.cache
        .set_ex(&list_key(0, 10), b"definitely not json", TTL)
        .await
        .unwrap();

    let err = h.users.list_users(0, 10).await.unwrap_err();

    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(h.spy.lists(), 0);
}

#[tokio::test]
async fn test_unreachable_cache_degrades_to_always_miss() {
    let repo = InMemoryUserRepository::new();
    repo.create(new_user("ada@example.com")).await.unwrap();
    let spy = Arc::new(CountingService {
        inner: UserManager::new(Arc::new(repo)),
        lists: AtomicUsize::new(0),
        gets: AtomicUsize::new(0),
    });
    let users = CachedUserService::new(
        spy.clone(),
        Arc::new(UnreachableCache),
        TTL,
        CacheMetrics::new(),
    );

    for _ in 0..3 {
        assert_eq!(users.list_users(0, 5).await.unwrap().len(), 1);
        assert_eq!(users.get_user("ada@example.com").await.unwrap().age, 30);
    }

    assert_eq!(spy.lists(), 3);
    assert_eq!(spy.gets(), 3);
}

#[tokio::test]
async fn test_concurrent_misses_all_reach_service() {
    let repo = InMemoryUserRepository::new();
    repo.create(new_user("a@example.com")).await.unwrap();
    let spy = Arc::new(GatedService {
        inner: UserManager::new(Arc::new(repo)),
        gate: Barrier::new(2),
        lists: AtomicUsize::new(0),
    });
    let cache = Arc::new(CountingCache {
        inner: InMemoryCache::new(),
        writes: AtomicUsize::new(0),
    });
    let users = CachedUserService::new(spy.clone(), cache.clone(), TTL, CacheMetrics::new());

    // Both calls miss before either writes back; no de-duplication
    let (a, b) = tokio::join!(users.list_users(0, 5), users.list_users(0, 5));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(spy.lists.load(Ordering::SeqCst), 2);
    assert_eq!(cache.writes.load(Ordering::SeqCst), 2);
    assert!(cache.inner.ttl_remaining("0:5").await.is_some());
}
