//! Reel Storage Library
//!
//! This crate provides the storage abstraction for uploaded media and its
//! local filesystem implementation.
//!
//! # Storage layout
//!
//! The storage directory is flat. Every stored file is named
//! `{field}-{timestamp}-{random}.{ext}` (see the `keys` module); there is no
//! manifest or index, existence is a filesystem stat. Uploads in flight live
//! under hidden `.upload-{uuid}.part` names that are never resolvable as media.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{
    ByteStream, MediaReader, StagedUpload, Storage, StorageError, StorageResult, StoredMedia,
};
