use crate::keys;
use crate::traits::{MediaReader, StagedUpload, Storage, StorageError, StorageResult, StoredMedia};
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

/// How many fresh names `commit` tries before giving up
const MAX_NAME_ATTEMPTS: usize = 5;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Flat directory holding the stored media (e.g., "/var/lib/reel/videos")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a media name to a filesystem path with security validation
    ///
    /// Names are single path components from a restricted character set, so
    /// the result can never point outside the storage directory or at a
    /// staging file.
    fn key_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if !keys::is_valid_media_name(name) {
            return Err(StorageError::InvalidKey(format!(
                "Media name contains invalid characters: {}",
                name
            )));
        }
        Ok(self.base_path.join(name))
    }

    /// Remove staging files left behind by a previous process.
    pub async fn purge_staging_files(&self) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !keys::is_staging_name(name) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(error = %e, file = %name, "Failed to remove stale staging file");
                }
            }
        }

        if removed > 0 {
            tracing::info!(
                removed,
                path = %self.base_path.display(),
                "Removed incomplete uploads from previous run"
            );
        }

        Ok(removed)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn stage_upload<'r>(
        &self,
        field: &str,
        original_filename: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin + 'r>>,
        max_bytes: u64,
    ) -> StorageResult<StagedUpload> {
        let extension = keys::extract_extension(original_filename).ok_or_else(|| {
            StorageError::InvalidKey(format!(
                "File name has no usable extension: {}",
                original_filename
            ))
        })?;
        let start = std::time::Instant::now();

        // Created before the file so cancellation at any await point cleans up
        let mut staged = StagedUpload {
            temp_path: self.base_path.join(keys::staging_name(Uuid::new_v4())),
            field: field.to_string(),
            extension,
            size_bytes: 0,
        };

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staged.temp_path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    staged.temp_path.display(),
                    e
                ))
            })?;

        // Read one byte past the ceiling to detect oversized bodies.
        // Reader errors are passed through untouched for the caller to classify.
        let mut limited = reader.take(max_bytes.saturating_add(1));
        let bytes_copied = tokio::io::copy(&mut limited, &mut file).await?;

        if bytes_copied > max_bytes {
            tracing::debug!(
                limit = max_bytes,
                field = %field,
                "Upload exceeded size limit, discarding"
            );
            return Err(StorageError::TooLarge { limit: max_bytes });
        }

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                staged.temp_path.display(),
                e
            ))
        })?;

        staged.size_bytes = bytes_copied;

        tracing::debug!(
            path = %staged.temp_path.display(),
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload staged"
        );

        Ok(staged)
    }

    async fn commit(&self, staged: StagedUpload) -> StorageResult<StoredMedia> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = keys::generate_media_name(&staged.field, &staged.extension);
            let final_path = self.key_to_path(&name)?;

            // A hard link never replaces an existing file, which makes the
            // publish step atomic and collision-checked in one call.
            match fs::hard_link(&staged.temp_path, &final_path).await {
                Ok(()) => {
                    if let Err(e) = fs::remove_file(&staged.temp_path).await {
                        tracing::warn!(
                            error = %e,
                            path = %staged.temp_path.display(),
                            "Failed to unlink staging file after commit"
                        );
                    }
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::warn!(attempt, name = %name, "Generated media name already taken");
                    continue;
                }
                // Filesystems without hard links fall back to rename
                Err(link_err) => match rename_into_place(&staged.temp_path, &final_path).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                        tracing::warn!(attempt, name = %name, "Generated media name already taken");
                        continue;
                    }
                    Err(e) => {
                        return Err(StorageError::UploadFailed(format!(
                            "Failed to publish {} (link: {}, rename: {})",
                            final_path.display(),
                            link_err,
                            e
                        )));
                    }
                },
            }

            tracing::info!(
                path = %final_path.display(),
                file_name = %name,
                size_bytes = staged.size_bytes,
                "Local storage upload successful"
            );

            return Ok(StoredMedia {
                name,
                size_bytes: staged.size_bytes,
            });
        }

        Err(StorageError::UploadFailed(format!(
            "Could not allocate an unused media name after {} attempts",
            MAX_NAME_ATTEMPTS
        )))
    }

    async fn open(&self, name: &str) -> StorageResult<MediaReader> {
        let path = self.key_to_path(name)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let metadata = file.metadata().await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to stat file {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(MediaReader {
            file,
            size: metadata.len(),
        })
    }
}

/// Claim `target` with `create_new`, then move the staged file over the claim.
///
/// An existing file at `target` is never replaced. The claim is an empty file
/// until the rename lands, under a name no client has been told yet.
async fn rename_into_place(staged: &Path, target: &Path) -> io::Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .await?;

    if let Err(e) = fs::rename(staged, target).await {
        if let Err(cleanup) = fs::remove_file(target).await {
            tracing::warn!(error = %cleanup, path = %target.display(), "Failed to drop name claim");
        }
        return Err(e);
    }
    Ok(())
}
