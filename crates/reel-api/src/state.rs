//! Application state shared by all handlers.

use reel_core::Config;
use reel_storage::Storage;
use std::sync::Arc;

/// Upload acceptance rules, resolved once from configuration.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_bytes: u64,
    pub field_name: String,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_bytes: config.max_upload_bytes(),
            field_name: config.upload_field_name().to_string(),
            allowed_extensions: config.allowed_extensions().to_vec(),
            allowed_content_types: config.allowed_content_types().to_vec(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub upload: UploadLimits,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let upload = UploadLimits::from_config(&config);
        Self {
            config,
            storage,
            upload,
        }
    }
}
