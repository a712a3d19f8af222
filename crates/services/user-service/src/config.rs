//! User service configuration.

use std::env;
use std::str::FromStr;

use common::{CacheConfig, DatabaseConfig, ServiceConfig};

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    /// Listener and request deadline
    pub service: ServiceConfig,
    /// Postgres pool and per-call timeout
    pub database: DatabaseConfig,
    /// Redis connection, entry TTL and per-call timeout
    pub cache: CacheConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let service = ServiceConfig::default();
        let database = DatabaseConfig::default();
        let cache = CacheConfig::default();

        Self {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME").unwrap_or(service.service_name),
                version: env::var("APP_VERSION").unwrap_or(service.version),
                host: env::var("HOST").unwrap_or(service.host),
                port: parse_or("PORT", service.port),
                request_timeout_seconds: parse_or(
                    "REQUEST_TIMEOUT_SECONDS",
                    service.request_timeout_seconds,
                ),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .or_else(|_| env::var("USER_SERVICE_DATABASE_URL"))
                    .unwrap_or(database.url),
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", database.max_connections),
                min_connections: parse_or("DATABASE_MIN_CONNECTIONS", database.min_connections),
                timeout_ms: parse_or("DATABASE_TIMEOUT_MS", database.timeout_ms),
            },
            cache: CacheConfig {
                url: env::var("REDIS_URL")
                    .or_else(|_| env::var("USER_SERVICE_REDIS_URL"))
                    .unwrap_or(cache.url),
                ttl_seconds: parse_or("CACHE_TTL_SECONDS", cache.ttl_seconds),
                timeout_ms: parse_or("CACHE_TIMEOUT_MS", cache.timeout_ms),
            },
        }
    }
}

/// Read and parse `key`, keeping `default` when unset or unparseable.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
