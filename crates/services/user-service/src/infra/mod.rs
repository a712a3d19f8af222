//! Infrastructure layer - database and cache backends.

pub mod cache;
mod db;
pub mod migrations;

use async_trait::async_trait;

use common::AppResult;

pub use cache::{CacheStore, InMemoryCache, RedisCache};
pub use db::Database;
pub use migrations::Migrator;

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockCacheStore;

/// Connectivity probe used by the health endpoint.
#[async_trait]
pub trait Ping: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}
