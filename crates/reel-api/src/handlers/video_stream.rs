use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::content_type_for;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use reel_core::{AppError, RangeRequest};
use reel_storage::StorageError;
use std::sync::Arc;

/// Serve a stored video whole (200) or as a single byte range (206).
///
/// The file is streamed in fixed-size chunks for both paths. A missing or
/// unresolvable name is 404 whether or not a `Range` header was sent; a
/// malformed or out-of-bounds range is 416.
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let media = state.storage.open(&filename).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
            HttpAppError(AppError::NotFound("Video not found".to_string()))
        }
        other => HttpAppError::from(other),
    })?;
    let size = media.size();
    let content_type = content_type_for(&filename);

    // A header that is not visible ASCII cannot be a valid range
    let range_header = headers
        .get(header::RANGE)
        .map(|value| value.to_str().unwrap_or_default());

    let builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    let response = match RangeRequest::evaluate(range_header, size) {
        RangeRequest::Absent => {
            tracing::debug!(file_name = %filename, size_bytes = size, "Serving full file");
            let stream = media.into_stream(None).await?;
            builder
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, size)
                .body(Body::from_stream(stream))
        }
        RangeRequest::Partial(range) => {
            tracing::debug!(
                file_name = %filename,
                range_start = range.start,
                range_end = range.end,
                size_bytes = size,
                "Serving byte range"
            );
            let stream = media.into_stream(Some(range)).await?;
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, range.content_range(size))
                .header(header::CONTENT_LENGTH, range.len())
                .body(Body::from_stream(stream))
        }
        RangeRequest::Unsatisfiable => {
            tracing::debug!(
                file_name = %filename,
                range = range_header.unwrap_or_default(),
                size_bytes = size,
                "Rejecting unsatisfiable range"
            );
            return Err(AppError::RangeNotSatisfiable { size }.into());
        }
    };

    response.map_err(|e| {
        HttpAppError(AppError::Internal(format!(
            "Failed to build stream response: {}",
            e
        )))
    })
}
