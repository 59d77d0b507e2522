use super::Authenticator;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use reel_core::AppError;
use std::sync::Arc;

/// Rejects the request with 401 unless the authenticator accepts its
/// `Authorization` header. Runs before any handler logic.
pub async fn auth_middleware(
    State(authenticator): State<Arc<dyn Authenticator>>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if !authenticator.check(authorization) {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            credentials_present = authorization.is_some(),
            "Authentication failed"
        );
        return HttpAppError(AppError::Unauthorized(
            "Authentication required".to_string(),
        ))
        .into_response();
    }

    next.run(request).await
}
