//! Test helpers: build the router over a scratch storage directory.
//!
//! Run from workspace root: `cargo test -p reel-api`.

#![allow(dead_code)] // each test binary uses a different subset

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine};
use reel_api::setup::build_app;
use reel_core::{Config, MediaServerConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

pub const TEST_USER: &str = "tester";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Test application: server plus the scratch directory it stores into.
pub struct TestApp {
    pub server: TestServer,
    pub storage_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Every entry in the storage directory, staging files included
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.storage_dir)
            .expect("storage directory should exist")
            .map(|entry| {
                entry
                    .expect("readable entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }

    /// Place a file directly in the storage directory
    pub fn put_file(&self, name: &str, data: &[u8]) {
        std::fs::write(self.storage_dir.join(name), data).expect("write fixture file");
    }
}

/// Setup test app with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with configuration overrides (environment variable names).
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage_dir = temp_dir.path().join("videos");

    let mut vars: HashMap<String, String> = HashMap::from([
        ("BASIC_AUTH_USER".to_string(), TEST_USER.to_string()),
        ("BASIC_AUTH_PASSWORD".to_string(), TEST_PASSWORD.to_string()),
        (
            "STORAGE_DIR".to_string(),
            storage_dir.to_string_lossy().into_owned(),
        ),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from(
        MediaServerConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("Failed to build test configuration"),
    );
    let (_state, app) = build_app(config).await.expect("Failed to build app");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage_dir,
        _temp_dir: temp_dir,
    }
}

/// `Authorization` header value for the test credentials
pub fn basic_auth() -> String {
    basic_auth_for(TEST_USER, TEST_PASSWORD)
}

pub fn basic_auth_for(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

/// Multipart body with one file part in the `video` field
pub fn video_form(file_name: &str, mime_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data).file_name(file_name).mime_type(mime_type),
    )
}

/// Upload `data` as an mp4 and return the path from the response
pub async fn upload_mp4(server: &TestServer, data: Vec<u8>) -> String {
    let response = server
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(video_form("clip.mp4", "video/mp4", data))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Video uploaded successfully");
    body["path"]
        .as_str()
        .expect("path should be a string")
        .to_string()
}
