use crate::{LocalStorage, Storage, StorageResult};
use reel_core::Config;
use std::sync::Arc;

/// Create the storage backend from configuration.
///
/// Also sweeps staging files left over from an interrupted previous run.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.storage_dir()).await?;

    if let Err(e) = storage.purge_staging_files().await {
        tracing::warn!(error = %e, "Failed to sweep staging files");
    }

    tracing::info!(
        path = %storage.base_path().display(),
        "Local storage initialized"
    );

    Ok(Arc::new(storage))
}
