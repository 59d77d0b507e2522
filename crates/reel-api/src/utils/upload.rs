//! Common utilities for the upload and streaming handlers

use reel_core::AppError;
use reel_storage::keys::extract_extension;

/// Served when a stored name carries no recognised video extension
const DEFAULT_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Normalize MIME type by stripping parameters (e.g. "video/mp4; codecs=avc1" -> "video/mp4").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_ascii_lowercase()
}

/// Validate content type against allowlist. Compares normalized MIME type only (no parameter bypass).
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type);
    if !allowed_types
        .iter()
        .any(|ct| ct.eq_ignore_ascii_case(&normalized))
    {
        return Err(AppError::UnsupportedMediaType(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Validate the extension of an untrusted filename and return it lowercased
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    match extract_extension(filename) {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(extension),
        _ => Err(AppError::UnsupportedMediaType(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        ))),
    }
}

/// Content type to serve a stored file with, chosen by its extension
pub fn content_type_for(name: &str) -> &'static str {
    match extract_extension(name).as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg") | Some("ogv") => "video/ogg",
        _ => DEFAULT_VIDEO_CONTENT_TYPE,
    }
}
