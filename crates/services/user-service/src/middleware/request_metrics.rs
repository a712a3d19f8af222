//! Request count and latency recording.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Record every request into the injected [`HttpMetrics`](crate::observability::HttpMetrics).
pub async fn track_metrics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    state
        .http_metrics
        .record(&method, start.elapsed().as_secs_f64());
    response
}
