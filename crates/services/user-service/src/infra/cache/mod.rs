//! Cache store abstraction.
//!
//! The rest of the service sees the cache only as get / set-with-expiry over
//! opaque byte blobs.

mod memory;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub use self::memory::InMemoryCache;
pub use self::redis_cache::RedisCache;

/// Key/value store with expiry.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the blob stored under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> AppResult<()>;
}
