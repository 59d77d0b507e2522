//! Reel API Library
//!
//! This crate provides the HTTP front door of the media server: upload and
//! range-streaming handlers, the Basic-auth access gate, cross-origin headers,
//! and application setup.

// Module declarations
mod handlers;
mod middleware;
mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use auth::{Authenticator, BasicAuthenticator};
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
