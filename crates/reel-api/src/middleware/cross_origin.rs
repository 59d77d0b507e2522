use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Headers attached to every response so the player can be embedded from a
/// separate front-end origin.
const CROSS_ORIGIN_HEADERS: [(&str, &str); 6] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("access-control-allow-headers", "Content-Type, Authorization"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("cross-origin-embedder-policy", "credentialless"),
    // Prevent MIME type sniffing
    ("x-content-type-options", "nosniff"),
];

/// Cross-origin middleware
///
/// Answers `OPTIONS` preflights itself with an empty 200 (they never carry
/// credentials, so this must sit outside the auth layer) and stamps the
/// cross-origin headers on every other response, including errors.
pub async fn cross_origin_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    for (name, value) in CROSS_ORIGIN_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}
