//! User Service Library
//!
//! A user directory over HTTP: paginated listing, lookup by email and
//! creation, with a cache-aside layer in front of the Postgres-backed
//! directory service.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod infra;
pub mod observability;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::{Database, RedisCache};
use crate::observability::{CacheMetrics, HttpMetrics};
use crate::repository::UserStore;
use crate::routes::create_router;
use crate::service::{CachedUserService, UserManager};
use crate::state::AppState;

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(service = %config.service.service_name, version = %config.service.version, "Starting");

    // Recorder first: handles built before it would be no-ops
    let prometheus = observability::install_recorder(&config.service.version)?;

    // Initialize backends
    let db = Database::connect(&config.database).await?;
    let cache = Arc::new(RedisCache::connect(&config.cache).await?);

    // Repository -> directory service -> cache-aside proxy
    let user_repo =
        Arc::new(UserStore::new(db.get_connection()).with_timeout(config.database.timeout()));
    let directory = Arc::new(UserManager::new(user_repo));
    let users = Arc::new(CachedUserService::new(
        directory,
        cache.clone(),
        config.cache.ttl(),
        CacheMetrics::new(),
    ));

    let state = AppState::new(users)
        .with_metrics(HttpMetrics::new(), prometheus)
        .with_probe("database", Arc::new(db))
        .with_probe("redis", cache);

    let app = create_router(state, config.service.request_timeout());

    // Build address
    let addr: SocketAddr = config.service.addr().parse()?;
    info!("User service listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("User service stopped");
    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
