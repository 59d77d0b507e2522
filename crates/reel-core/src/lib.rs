//! Reel Core Library
//!
//! This crate provides the configuration, error types and byte-range parsing
//! shared by the storage backend and the HTTP front door.

pub mod config;
pub mod error;
pub mod range;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, MediaServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use range::{ByteRange, RangeRequest, RangeSpec};
