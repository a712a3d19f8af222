//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::debug;

use common::{with_timeout, AppResult, CacheConfig};

use super::CacheStore;
use crate::infra::Ping;

/// Redis cache wrapper.
///
/// `ConnectionManager` multiplexes one reconnecting connection across all
/// callers; every call is bounded by the configured timeout.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(config: &CacheConfig) -> Result<Self, RedisError> {
        debug!("Connecting to Redis");
        let client = redis::Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        with_timeout("cache", self.timeout, async move {
            let value: Option<Vec<u8>> = conn.get(key).await?;
            Ok(value)
        })
        .await
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        with_timeout("cache", self.timeout, async move {
            conn.set_ex::<_, _, ()>(key, value, seconds).await?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl Ping for RedisCache {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        with_timeout("cache", self.timeout, async move {
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }
}
