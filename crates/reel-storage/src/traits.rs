//! Storage abstraction trait
//!
//! This module defines the Storage trait the HTTP layer talks to, together
//! with the handles it hands out: a staged upload that only becomes visible
//! once committed, and a reader for whole-file or byte-range streaming.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use reel_core::ByteRange;
use std::io::{self, SeekFrom};
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

/// Read buffer used when streaming media to a client
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Upload exceeds limit of {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Body stream handed to the HTTP layer
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

/// A media file that has been committed under its final name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub name: String,
    pub size_bytes: u64,
}

/// An upload written to a hidden staging file.
///
/// Dropping a staged upload without committing it removes the staging file,
/// so an aborted request (validation failure, I/O error, client disconnect)
/// never leaves anything behind.
#[derive(Debug)]
pub struct StagedUpload {
    pub(crate) temp_path: PathBuf,
    pub(crate) field: String,
    pub(crate) extension: String,
    pub(crate) size_bytes: u64,
}

impl StagedUpload {
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => {
                tracing::debug!(
                    path = %self.temp_path.display(),
                    "Discarded uncommitted upload"
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.temp_path.display(),
                    "Failed to remove staging file"
                );
            }
        }
    }
}

/// An open stored file, ready to be streamed whole or in part
#[derive(Debug)]
pub struct MediaReader {
    pub(crate) file: File,
    pub(crate) size: u64,
}

impl MediaReader {
    /// Size of the stored file in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Turn the reader into a body stream, optionally limited to `range`.
    ///
    /// The file is read in fixed-size chunks; memory use does not depend on
    /// the file size. Dropping the stream closes the file.
    pub async fn into_stream(self, range: Option<ByteRange>) -> StorageResult<ByteStream> {
        let mut file = self.file;
        let stream: ByteStream = match range {
            Some(range) => {
                file.seek(SeekFrom::Start(range.start)).await.map_err(|e| {
                    StorageError::DownloadFailed(format!(
                        "Failed to seek to offset {}: {}",
                        range.start, e
                    ))
                })?;
                Box::pin(ReaderStream::with_capacity(
                    file.take(range.len()),
                    STREAM_CHUNK_SIZE,
                ))
            }
            None => Box::pin(ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE)),
        };
        Ok(stream)
    }
}

/// Storage abstraction trait
///
/// The HTTP layer only depends on this trait, so the backend can be replaced
/// without touching routing or handlers.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream an upload into a staging file.
    ///
    /// The extension is taken from `original_filename` after sanitization;
    /// `field` labels the generated name. Fails with `TooLarge` as soon as
    /// more than `max_bytes` have been read. Errors raised by `reader` come
    /// back unchanged as `IoError`. Nothing is visible to readers until
    /// [`Storage::commit`] succeeds.
    async fn stage_upload<'r>(
        &self,
        field: &str,
        original_filename: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin + 'r>>,
        max_bytes: u64,
    ) -> StorageResult<StagedUpload>;

    /// Publish a staged upload under a freshly generated, unused name
    async fn commit(&self, staged: StagedUpload) -> StorageResult<StoredMedia>;

    /// Open a stored file by name
    async fn open(&self, name: &str) -> StorageResult<MediaReader>;
}
