//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use reel_core::Config;
use std::sync::Arc;

/// Initialize the entire application, including the global tracing subscriber
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Telemetry first so validation warnings are visible
    crate::telemetry::init_telemetry(config.log_format())
        .context("Failed to initialize telemetry")?;

    let app = build_app(config.clone()).await?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    Ok(app)
}

/// Validate configuration, open storage and build the router.
///
/// Does not touch global state, so tests can build as many apps as they need.
pub async fn build_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    let storage = reel_storage::create_storage(&config)
        .await
        .with_context(|| {
            format!(
                "Failed to initialize storage at {}",
                config.storage_dir().display()
            )
        })?;

    let state = Arc::new(AppState::new(config.clone(), storage));
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
