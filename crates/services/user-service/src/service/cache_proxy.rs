//! Cache-aside proxy over a [`UserService`].
//!
//! Reads consult the cache first and populate it on miss. Writes go straight
//! to the wrapped service and never touch the cache, so cached pages and
//! lookups stay stale until their TTL runs out.
//!
//! Concurrent misses on the same key all reach the wrapped service and all
//! write back; the last write wins.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use common::{AppError, AppResult};
use domain::{CreateUser, ListQuery, User};

use super::UserService;
use crate::infra::CacheStore;
use crate::observability::{CacheMetrics, LookupCounters};

/// Cache key for one page of users.
pub fn list_key(offset: i64, limit: i64) -> String {
    format!("{}:{}", offset, limit)
}

/// Cache key for a single user.
pub fn user_key(email: &str) -> String {
    email.to_string()
}

/// [`UserService`] decorated with a read-through cache.
pub struct CachedUserService {
    inner: Arc<dyn UserService>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    metrics: CacheMetrics,
}

impl CachedUserService {
    pub fn new(
        inner: Arc<dyn UserService>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            inner,
            cache,
            ttl,
            metrics,
        }
    }

    /// Read `key` from the cache.
    ///
    /// An unreachable cache is a miss. A value that cannot be decoded is an
    /// error for this call.
    async fn lookup<T: DeserializeOwned>(
        &self,
        key: &str,
        counters: &LookupCounters,
    ) -> AppResult<Option<T>> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                counters.miss.increment(1);
                debug!(key = %key, "Cache miss");
                return Ok(None);
            }
            Err(e) => {
                counters.backend_error.increment(1);
                warn!(key = %key, error = %e, "Cache read failed, falling back to service");
                return Ok(None);
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                counters.hit.increment(1);
                debug!(key = %key, "Cache hit");
                Ok(Some(value))
            }
            Err(e) => {
                counters.decode_error.increment(1);
                error!(key = %key, error = %e, "Cached value could not be decoded");
                Err(AppError::internal(format!(
                    "corrupted cache entry {}: {}",
                    key, e
                )))
            }
        }
    }

    /// Best-effort write-back; failures are logged and dropped.
    async fn populate<T: Serialize>(&self, key: &str, value: &T, counters: &LookupCounters) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                counters.write_failed.increment(1);
                warn!(key = %key, error = %e, "Failed to serialize value for cache");
                return;
            }
        };

        match self.cache.set_ex(key, &bytes, self.ttl).await {
            Ok(()) => {
                counters.stored.increment(1);
                debug!(key = %key, ttl = ?self.ttl, "Cached value");
            }
            Err(e) => {
                counters.write_failed.increment(1);
                warn!(key = %key, error = %e, "Cache write-back failed");
            }
        }
    }
}

#[async_trait]
impl UserService for CachedUserService {
    async fn list_users(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        // An invalid page can never be cached, skip the round trip
        ListQuery::new(offset, limit)?;

        let key = list_key(offset, limit);
        let counters = &self.metrics.list_users;

        if let Some(users) = self.lookup(&key, counters).await? {
            return Ok(users);
        }

        let users = self.inner.list_users(offset, limit).await?;
        self.populate(&key, &users, counters).await;
        Ok(users)
    }

    async fn get_user(&self, email: &str) -> AppResult<User> {
        let key = user_key(email);
        let counters = &self.metrics.get_user;

        if let Some(user) = self.lookup(&key, counters).await? {
            return Ok(user);
        }

        let user = self.inner.get_user(email).await?;
        self.populate(&key, &user, counters).await;
        Ok(user)
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<i32> {
        self.inner.create_user(input).await
    }
}
