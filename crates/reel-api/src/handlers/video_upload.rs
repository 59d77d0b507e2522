use crate::error::{multipart_error, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{validate_content_type, validate_file_extension};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use futures::TryStreamExt;
use reel_core::AppError;
use reel_storage::StagedUpload;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tokio_util::io::StreamReader;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub path: String,
}

/// Accept one video file from a multipart body.
///
/// The file is streamed to a staging file while it is read, so memory use
/// does not depend on its size. It only becomes visible under its final name
/// once the whole body has been consumed without error.
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut multipart = multipart.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid upload request: {}", rejection.body_text()))
    })?;
    let limits = &state.upload;
    let start = std::time::Instant::now();
    let mut staged: Option<StagedUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpAppError(multipart_error(&e)))?
    {
        // Other fields, and non-file parts under the upload name, are skipped
        let is_upload = field.name() == Some(limits.field_name.as_str())
            && field.file_name().is_some();
        if !is_upload {
            continue;
        }

        if staged.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Only one file may be sent in the '{}' field",
                limits.field_name
            ))
            .into());
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        validate_content_type(&content_type, &limits.allowed_content_types)?;
        let extension = validate_file_extension(&filename, &limits.allowed_extensions)?;

        let reader = StreamReader::new(Box::pin(field.map_err(io::Error::other)));
        let upload = state
            .storage
            .stage_upload(
                &limits.field_name,
                &filename,
                Box::pin(reader),
                limits.max_bytes,
            )
            .await?;

        tracing::debug!(
            extension = %extension,
            content_type = %content_type,
            size_bytes = upload.size_bytes(),
            "Upload field received"
        );
        staged = Some(upload);
    }

    let staged =
        staged.ok_or_else(|| AppError::MissingFile("No video file provided".to_string()))?;
    let stored = state.storage.commit(staged).await?;

    tracing::info!(
        file_name = %stored.name,
        size_bytes = stored.size_bytes,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Video uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Video uploaded successfully".to_string(),
        path: format!("/videos/{}", stored.name),
    }))
}
