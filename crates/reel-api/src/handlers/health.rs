use crate::error::HttpAppError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use reel_core::AppError;

/// Liveness probe - process is running. Never requires credentials.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Fallback for paths no route matches
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Not found".to_string()))
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> HttpAppError {
    HttpAppError(AppError::MethodNotAllowed)
}
