//! Storage naming for uploaded media.
//!
//! Name format: `{field}-{timestamp_ms}-{random}.{ext}`. The timestamp never
//! goes backwards within a process and the random suffix is drawn per call, so
//! concurrent uploads need no coordination to avoid collisions. The extension
//! is the only client-controlled part and is restricted to ASCII alphanumerics.

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Longest extension accepted from a client-supplied filename
pub const MAX_EXTENSION_LEN: usize = 10;

/// Longest name the storage directory will resolve
pub const MAX_NAME_LEN: usize = 255;

/// Prefix and suffix of in-flight upload files
pub(crate) const STAGING_PREFIX: &str = ".upload-";
pub(crate) const STAGING_SUFFIX: &str = ".part";

const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Current wall-clock milliseconds, clamped so it never decreases.
fn next_timestamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_TIMESTAMP_MS.fetch_max(now, Ordering::SeqCst);
    previous.max(now)
}

/// Extract the extension from an untrusted client filename.
///
/// Only the final path component is considered. Returns the lowercased
/// extension, or `None` when there is no extension or it contains anything
/// other than ASCII letters and digits.
pub fn extract_extension(original_filename: &str) -> Option<String> {
    let base = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);
    let (_, extension) = base.rsplit_once('.')?;

    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LEN
        || !extension.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(extension.to_ascii_lowercase())
}

/// Reduce a field label to `[a-z0-9_]`, falling back to `media`.
fn sanitize_field(field: &str) -> String {
    let label: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(32)
        .collect::<String>()
        .to_ascii_lowercase();

    if label.is_empty() {
        "media".to_string()
    } else {
        label
    }
}

/// Generate a fresh media name for the given field label and extension.
///
/// The extension must already have passed [`extract_extension`]; it is
/// re-filtered here so a name can never carry a separator.
pub fn generate_media_name(field: &str, extension: &str) -> String {
    let suffix = rand::rng().random_range(0..RANDOM_SUFFIX_BOUND);
    let extension: String = extension
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect();

    format!(
        "{}-{}-{}.{}",
        sanitize_field(field),
        next_timestamp_ms(),
        suffix,
        extension.to_ascii_lowercase()
    )
}

/// Whether `name` may be resolved inside the storage directory.
///
/// Accepts a single path component made of `[A-Za-z0-9._-]`, not starting
/// with a dot (which also excludes staging files) and without `..`.
pub fn is_valid_media_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

/// Name of a staging file for an in-flight upload
pub(crate) fn staging_name(id: uuid::Uuid) -> String {
    format!("{}{}{}", STAGING_PREFIX, id, STAGING_SUFFIX)
}

pub(crate) fn is_staging_name(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX) && name.ends_with(STAGING_SUFFIX)
}
