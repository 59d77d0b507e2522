//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use reel_core::Config;

/// Passwords shorter than this are accepted but warned about in production
const MIN_RECOMMENDED_PASSWORD_LEN: usize = 12;

/// Validate critical configuration values
///
/// Fails fast on settings that would make every upload fail or open the
/// server to anyone; only warns on settings that are merely weak.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.max_upload_bytes() == 0 {
        return Err(anyhow::anyhow!("Maximum upload size cannot be 0"));
    }

    if config.allowed_extensions().is_empty() {
        return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
    }

    if let Some(bad) = config
        .allowed_extensions()
        .iter()
        .find(|ext| !ext.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()))
    {
        return Err(anyhow::anyhow!(
            "Invalid extension '{}' in ALLOWED_EXTENSIONS: only letters and digits are allowed",
            bad
        ));
    }

    if config.allowed_content_types().is_empty() {
        return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES cannot be empty"));
    }

    if let Some(bad) = config
        .allowed_content_types()
        .iter()
        .find(|ct| !ct.starts_with("video/") || ct.len() == "video/".len())
    {
        return Err(anyhow::anyhow!(
            "Invalid content type '{}' in ALLOWED_CONTENT_TYPES: expected video/*",
            bad
        ));
    }

    if config.basic_auth_user().is_empty() || config.basic_auth_password().is_empty() {
        return Err(anyhow::anyhow!(
            "BASIC_AUTH_USER and BASIC_AUTH_PASSWORD cannot be empty"
        ));
    }

    if config.basic_auth_user().contains(':') {
        return Err(anyhow::anyhow!("BASIC_AUTH_USER cannot contain ':'"));
    }

    if config.is_production() && config.basic_auth_password().len() < MIN_RECOMMENDED_PASSWORD_LEN
    {
        tracing::warn!(
            min_length = MIN_RECOMMENDED_PASSWORD_LEN,
            "BASIC_AUTH_PASSWORD is short for a production deployment"
        );
    }

    Ok(())
}
