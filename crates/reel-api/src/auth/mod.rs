//! Access gate: the credential check capability and the middleware that
//! enforces it on protected routes.

pub mod basic;
pub mod middleware;

pub use basic::BasicAuthenticator;

/// Decides whether a request's `Authorization` header grants access.
///
/// Routing only depends on this trait, so the shared Basic credential pair
/// can be replaced by another scheme without touching handlers.
pub trait Authenticator: Send + Sync {
    fn check(&self, authorization: Option<&str>) -> bool;
}
