//! Timeout wrapper for backend calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Bound a backend call by `duration`.
///
/// Exceeding the bound is a transport failure (`ServiceUnavailable`), never a
/// "not found". The inner future is dropped on expiry, which cancels the
/// in-flight request.
pub async fn with_timeout<F, T>(backend: &str, duration: Duration, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(duration, fut).await.map_err(|_| {
        tracing::warn!(backend, timeout = ?duration, "Backend call timed out");
        AppError::service_unavailable(format!("{} timed out after {:?}", backend, duration))
    })?
}
