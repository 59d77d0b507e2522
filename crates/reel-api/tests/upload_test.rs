//! Upload integration tests.
//!
//! Run with: `cargo test -p reel-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::sample_mp4;
use helpers::{basic_auth, setup_test_app, setup_test_app_with, upload_mp4, video_form};
use std::collections::HashSet;
use std::future::IntoFuture;

#[tokio::test]
async fn test_upload_round_trip() {
    let app = setup_test_app().await;
    let data = sample_mp4(150_000);

    let path = upload_mp4(app.client(), data.clone()).await;
    assert!(path.starts_with("/videos/video-"), "{path}");
    assert!(path.ends_with(".mp4"), "{path}");

    let response = app
        .client()
        .get(&path)
        .add_header("Authorization", basic_auth())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(&response.as_bytes()[..], &data[..]);

    // Exactly one published file, no staging leftovers
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn test_uploaded_extension_is_lowercased() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(video_form("Holiday.WEBM", "video/webm", vec![1, 2, 3]))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["path"].as_str().unwrap().ends_with(".webm"));
}

#[tokio::test]
async fn test_missing_video_field_is_400() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("title", "no file here")
        .add_part(
            "attachment",
            Part::bytes(vec![1u8, 2, 3])
                .file_name("clip.mp4")
                .mime_type("video/mp4"),
        );
    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "error": "No video file provided" }));
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_is_400() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .text("{}")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_disallowed_content_type_is_415() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(video_form("clip.mp4", "image/png", vec![0u8; 16]))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_disallowed_extension_is_415() {
    let app = setup_test_app().await;

    for name in ["clip.mov", "clip", "clip.mp4.exe", "../../etc/passwd"] {
        let response = app
            .client()
            .post("/upload")
            .add_header("Authorization", basic_auth())
            .multipart(video_form(name, "video/mp4", vec![0u8; 16]))
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "{name}"
        );
    }
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_413_and_leaves_nothing() {
    let app = setup_test_app_with(&[("MAX_UPLOAD_BYTES", "1024")]).await;

    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(video_form("big.mp4", "video/mp4", sample_mp4(4_096)))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_body_far_over_limit_is_413() {
    let app = setup_test_app_with(&[("MAX_UPLOAD_BYTES", "1024")]).await;

    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(video_form("huge.mp4", "video/mp4", sample_mp4(512 * 1024)))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_at_exact_limit_is_accepted() {
    let app = setup_test_app_with(&[("MAX_UPLOAD_BYTES", "1024")]).await;

    let path = upload_mp4(app.client(), sample_mp4(1_024)).await;
    assert!(path.starts_with("/videos/"));
    assert_eq!(app.stored_files().len(), 1);
}

#[tokio::test]
async fn test_second_video_file_rejects_whole_request() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part(
            "video",
            Part::bytes(sample_mp4(1_000))
                .file_name("one.mp4")
                .mime_type("video/mp4"),
        )
        .add_part(
            "video",
            Part::bytes(sample_mp4(2_000))
                .file_name("two.mp4")
                .mime_type("video/mp4"),
        );
    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let app = setup_test_app().await;
    let data = sample_mp4(3_000);

    let form = MultipartForm::new()
        .add_text("title", "Lecture 1")
        .add_part(
            "video",
            Part::bytes(data.clone())
                .file_name("lecture.mp4")
                .mime_type("video/mp4"),
        )
        .add_text("course", "intro");
    let response = app
        .client()
        .post("/upload")
        .add_header("Authorization", basic_auth())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let path = body["path"].as_str().unwrap();

    let stored = app
        .client()
        .get(path)
        .add_header("Authorization", basic_auth())
        .await;
    assert_eq!(&stored.as_bytes()[..], &data[..]);
}

#[tokio::test]
async fn test_concurrent_uploads_get_distinct_names() {
    let app = setup_test_app().await;
    let count = 12u8;

    let requests = (0..count).map(|i| {
        app.client()
            .post("/upload")
            .add_header("Authorization", basic_auth())
            .multipart(video_form("same.mp4", "video/mp4", vec![i; 4_000]))
            .into_future()
    });
    let responses = futures::future::join_all(requests).await;

    let mut paths = HashSet::new();
    for response in &responses {
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        paths.insert(body["path"].as_str().unwrap().to_string());
    }
    assert_eq!(paths.len(), count as usize);
    assert_eq!(app.stored_files().len(), count as usize);

    // Every file is independently retrievable with its own content
    for path in &paths {
        let response = app
            .client()
            .get(path)
            .add_header("Authorization", basic_auth())
            .await;
        let bytes = response.as_bytes();
        assert_eq!(bytes.len(), 4_000);
        assert!(bytes.iter().all(|b| *b == bytes[0]));
    }
}

#[tokio::test]
async fn test_unauthenticated_upload_stores_nothing() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .multipart(video_form("clip.mp4", "video/mp4", sample_mp4(1_000)))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(app.stored_files().is_empty());
}
