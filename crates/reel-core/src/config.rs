//! Configuration module
//!
//! This module provides the configuration structures for the media server:
//! listening address, storage directory, upload limits and allow-lists, and the
//! shared Basic-auth credential pair. Nothing here is hard-coded at the call
//! sites; every value can be overridden from the environment.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

// Common constants
const HOST: &str = "0.0.0.0";
const PORT: u16 = 4000;
const STORAGE_DIR: &str = "./uploads/videos";
const MAX_UPLOAD_SIZE_MB: u64 = 100;
const ALLOWED_EXTENSIONS: &str = "mp4,webm,ogg";
const ALLOWED_CONTENT_TYPES: &str = "video/mp4,video/webm,video/ogg";
const UPLOAD_FIELD_NAME: &str = "video";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Console output format for the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Process-level settings that are not specific to media handling
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub host: String,
    pub server_port: u16,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

/// Media server configuration
#[derive(Clone)]
pub struct MediaServerConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_dir: PathBuf,
    // Upload acceptance
    pub max_upload_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub upload_field_name: String,
    // Shared Basic-auth credential pair
    pub basic_auth_user: String,
    pub basic_auth_password: String,
}

impl fmt::Debug for MediaServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaServerConfig")
            .field("base", &self.base)
            .field("storage_dir", &self.storage_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("allowed_content_types", &self.allowed_content_types)
            .field("upload_field_name", &self.upload_field_name)
            .field("basic_auth_user", &self.basic_auth_user)
            .field("basic_auth_password", &"<redacted>")
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<MediaServerConfig>);

impl From<MediaServerConfig> for Config {
    fn from(config: MediaServerConfig) -> Self {
        Config(Box::new(config))
    }
}

impl Config {
    fn as_media(&self) -> &MediaServerConfig {
        &self.0
    }

    /// Load configuration from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = MediaServerConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment().to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.as_media().base.environment
    }

    pub fn host(&self) -> &str {
        &self.as_media().base.host
    }

    pub fn server_port(&self) -> u16 {
        self.as_media().base.server_port
    }

    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.server_port())
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_media().base.http_concurrency_limit
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_media().base.log_format
    }

    pub fn storage_dir(&self) -> &Path {
        &self.as_media().storage_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.as_media().max_upload_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.as_media().allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.as_media().allowed_content_types
    }

    pub fn upload_field_name(&self) -> &str {
        &self.as_media().upload_field_name
    }

    pub fn basic_auth_user(&self) -> &str {
        &self.as_media().basic_auth_user
    }

    pub fn basic_auth_password(&self) -> &str {
        &self.as_media().basic_auth_password
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl MediaServerConfig {
    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            host: lookup("HOST").unwrap_or_else(|| HOST.to_string()),
            server_port: lookup("PORT")
                .unwrap_or_else(|| PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            http_concurrency_limit: match lookup("HTTP_CONCURRENCY_LIMIT") {
                Some(limit) => limit.trim().parse::<usize>().map_err(|_| {
                    anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be a valid number")
                })?,
                None => HTTP_CONCURRENCY_LIMIT,
            }
            .max(1),
            log_format: lookup("LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(LogFormat::Compact),
        };

        // An exact byte ceiling wins over the MB setting
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(bytes) => bytes
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a valid number"))?,
            None => {
                let megabytes = match lookup("MAX_UPLOAD_SIZE_MB") {
                    Some(mb) => mb.trim().parse::<u64>().map_err(|_| {
                        anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number")
                    })?,
                    None => MAX_UPLOAD_SIZE_MB,
                };
                megabytes
                    .checked_mul(1024 * 1024)
                    .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?
            }
        };

        let config = MediaServerConfig {
            base,
            storage_dir: PathBuf::from(
                lookup("STORAGE_DIR").unwrap_or_else(|| STORAGE_DIR.to_string()),
            ),
            max_upload_bytes,
            allowed_extensions: parse_list(
                &lookup("ALLOWED_EXTENSIONS").unwrap_or_else(|| ALLOWED_EXTENSIONS.to_string()),
            ),
            allowed_content_types: parse_list(
                &lookup("ALLOWED_CONTENT_TYPES")
                    .unwrap_or_else(|| ALLOWED_CONTENT_TYPES.to_string()),
            ),
            upload_field_name: lookup("UPLOAD_FIELD_NAME")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UPLOAD_FIELD_NAME.to_string()),
            basic_auth_user: lookup("BASIC_AUTH_USER")
                .ok_or_else(|| anyhow::anyhow!("BASIC_AUTH_USER must be set"))?,
            basic_auth_password: lookup("BASIC_AUTH_PASSWORD")
                .ok_or_else(|| anyhow::anyhow!("BASIC_AUTH_PASSWORD must be set"))?,
        };

        Ok(config)
    }
}
