//! Route configuration and setup

use crate::auth::{middleware::auth_middleware, Authenticator, BasicAuthenticator};
use crate::handlers;
use crate::middleware::{cross_origin_middleware, request_id_middleware};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reel_core::Config;
use std::sync::Arc;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let authenticator: Arc<dyn Authenticator> = Arc::new(BasicAuthenticator::new(
        config.basic_auth_user(),
        config.basic_auth_password(),
    ));
    router_with_authenticator(config, state, authenticator)
}

/// Build the router around an arbitrary credential check
pub fn router_with_authenticator(
    config: &Config,
    state: Arc<AppState>,
    authenticator: Arc<dyn Authenticator>,
) -> Router<()> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .method_not_allowed_fallback(handlers::method_not_allowed);

    // Protected routes, including the not-found fallback
    let protected_routes = protected_routes(upload_body_limit(config.max_upload_bytes())).layer(
        axum::middleware::from_fn_with_state(authenticator, auth_middleware),
    );

    // Server-wide concurrency limit. Every route shares one semaphore.
    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    // Layers run outermost-last: request id, trace, cross-origin, limit
    public_routes
        .merge(protected_routes)
        .layer(concurrency_limit_layer(http_concurrency_limit))
        .layer(axum::middleware::from_fn(cross_origin_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn protected_routes(upload_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/upload",
            post(handlers::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/videos/{filename}", get(handlers::stream_video))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
}

/// `Router::layer` clones the layer per route, so the permits must live in the layer
fn concurrency_limit_layer(limit: usize) -> GlobalConcurrencyLimitLayer {
    GlobalConcurrencyLimitLayer::new(limit)
}

/// Transport-level body ceiling for the upload route
fn upload_body_limit(max_upload_bytes: u64) -> usize {
    usize::try_from(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX)
}
