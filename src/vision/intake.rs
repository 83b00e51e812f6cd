// Image intake: filename sanitizing, upload validation and encoding
// Author: kelexine (https://github.com/kelexine)

use super::models::{is_allowed_upload, validate_image_size, ImageFormat, ALLOWED_UPLOAD_EXTENSIONS};
use crate::error::{AppError, Result};
use crate::models::gemini::InlineData;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// Path separators become spaces and are then treated like any other
/// whitespace (joined with `_`), characters outside `[A-Za-z0-9_.-]` are
/// removed, and leading/trailing dots and underscores are stripped so the
/// result can never name a parent directory or a hidden file.
pub fn sanitize_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Validate an uploaded file and return the sanitized name to store it under.
pub fn validate_upload(filename: &str, data: &[u8], max_bytes: usize) -> Result<String> {
    if filename.is_empty() {
        return Err(AppError::InvalidRequest("No selected file.".to_string()));
    }

    if !is_allowed_upload(filename) {
        return Err(AppError::InvalidRequest(format!(
            "Only image files are allowed ({}).",
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        )));
    }

    validate_image_size(data.len(), max_bytes).map_err(AppError::InvalidRequest)?;

    if ImageFormat::sniff(data).is_none() {
        return Err(AppError::InvalidRequest(
            "File content is not a recognized image.".to_string(),
        ));
    }

    let safe = sanitize_filename(filename);
    // Sanitizing can eat the extension or the whole name (e.g. non-ASCII names)
    if !is_allowed_upload(&safe) {
        return Err(AppError::InvalidRequest(format!(
            "Filename '{}' is not usable after sanitizing.",
            filename
        )));
    }

    Ok(safe)
}

/// Write a validated upload into `upload_dir`.
pub async fn store_upload(upload_dir: &Path, safe_name: &str, data: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(safe_name);
    tokio::fs::write(&path, data).await?;
    debug!("Stored upload at {} ({} bytes)", path.display(), data.len());
    Ok(path)
}

/// Base64-encode image bytes for an inline-data request part.
pub fn encode_inline_data(data: &[u8], format: ImageFormat) -> InlineData {
    InlineData {
        mime_type: format.mime_type().to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(data),
    }
}
