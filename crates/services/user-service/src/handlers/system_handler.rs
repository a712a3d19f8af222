//! Root and metrics endpoints.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};

use common::{ApiResponse, AppError};

use crate::state::AppState;

/// Liveness greeting.
pub async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Hello, World!"))
}

/// Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => AppError::not_found("metrics recorder").into_response(),
    }
}
