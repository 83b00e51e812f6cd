// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::AppError;
use crate::languages::{self, LanguageTable, DEFAULT_LANGUAGE};
use crate::report;
use crate::vision::{store_upload, validate_upload};
use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

/// Body returned by `/upload` and `/capture`.
///
/// `result` is either the formatted analysis or an `Analysis result: ...`
/// failure message; analysis failures are not HTTP errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub result: String,
    pub image_path: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureQuery {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub result: String,
}

pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn languages_handler() -> Json<LanguageTable> {
    Json(LanguageTable)
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Without a key every analysis ends in an "invalid API key" message
    let key_check = if state.analyzer.vision().has_api_key() {
        HealthCheck {
            status: "ok".to_string(),
            message: format!("Model: {}", state.analyzer.vision().model()),
        }
    } else {
        overall_status = HealthStatus::Unhealthy;
        HealthCheck {
            status: "error".to_string(),
            message: "No Gemini API key configured".to_string(),
        }
    };
    checks.insert("gemini_api_key".to_string(), key_check);

    for (name, dir) in [
        ("upload_dir", &state.config.storage.upload_dir),
        ("reports_dir", &state.config.storage.reports_dir),
    ] {
        let check = if Path::new(dir).is_dir() {
            HealthCheck {
                status: "ok".to_string(),
                message: dir.clone(),
            }
        } else {
            if matches!(overall_status, HealthStatus::Healthy) {
                overall_status = HealthStatus::Degraded;
            }
            HealthCheck {
                status: "warning".to_string(),
                message: format!("{} does not exist yet", dir),
            }
        };
        checks.insert(name.to_string(), check);
    }

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Multipart upload: `file` (required) and `language` (optional, default `en`)
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read file: {}", e)))?;
                upload = Some((filename, data.to_vec()));
            }
            "language" => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read language: {}", e))
                })?;
                language = Some(value);
            }
            _ => {}
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::InvalidRequest("No file uploaded.".to_string()))?;
    let language = resolve_language(language.as_deref())?;

    let safe_name = validate_upload(&filename, &data, state.config.storage.max_upload_bytes)?;
    let path = store_upload(Path::new(&state.config.storage.upload_dir), &safe_name, &data).await?;

    info!(
        "Received upload {} ({} bytes), language={}",
        safe_name,
        data.len(),
        languages::display_name(&language).unwrap_or(language.as_str())
    );
    let result = state.analyzer.analyze(&path, &language).await;

    Ok(Json(AnalysisResponse {
        result,
        image_path: path.to_string_lossy().into_owned(),
        language,
    }))
}

/// Grab a webcam frame and analyze it
pub async fn capture_handler(
    State(state): State<AppState>,
    Query(query): Query<CaptureQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let language = resolve_language(query.language.as_deref())?;

    let path = state
        .camera
        .capture(Path::new(&state.config.storage.upload_dir))
        .await?;
    info!(
        "Captured frame {}, language={}",
        path.display(),
        languages::display_name(&language).unwrap_or(language.as_str())
    );
    let result = state.analyzer.analyze(&path, &language).await;

    Ok(Json(AnalysisResponse {
        result,
        image_path: path.to_string_lossy().into_owned(),
        language,
    }))
}

/// Render a PDF report for a previously analyzed image and send it back
pub async fn download_report_handler(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, AppError> {
    let image_path = resolve_upload_path(&state.config.storage.upload_dir, &req.image_path).await?;

    let reports_dir = PathBuf::from(&state.config.storage.reports_dir);
    tokio::fs::create_dir_all(&reports_dir).await?;
    let output = report::report_path(&reports_dir, &image_path);
    debug!("Rendering report for {} to {}", image_path.display(), output.display());

    let (image, target, result) = (image_path.clone(), output.clone(), req.result);
    let generated = tokio::task::spawn_blocking(move || {
        report::generate_pdf_report(&image, &result, &target)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Report task failed: {}", e)))?;

    if !generated || !output.exists() {
        return Err(AppError::Report("Failed to generate report".to_string()));
    }

    let bytes = tokio::fs::read(&output).await?;
    let filename = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.pdf".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Missing or empty means the default language; anything else must be in the table.
fn resolve_language(requested: Option<&str>) -> Result<String, AppError> {
    match requested.map(str::trim) {
        None | Some("") => Ok(DEFAULT_LANGUAGE.to_string()),
        Some(code) if languages::is_supported(code) => Ok(code.to_string()),
        Some(code) => Err(AppError::InvalidRequest(format!(
            "Unsupported language: {}",
            code
        ))),
    }
}

/// Accept only existing files inside the upload directory.
async fn resolve_upload_path(upload_dir: &str, requested: &str) -> Result<PathBuf, AppError> {
    let not_found = || AppError::InvalidRequest("Image not found".to_string());

    if requested.is_empty() {
        return Err(not_found());
    }

    let root = tokio::fs::canonicalize(upload_dir).await.map_err(|_| not_found())?;
    let image = tokio::fs::canonicalize(requested).await.map_err(|_| not_found())?;

    if !image.starts_with(&root) || !image.is_file() {
        return Err(not_found());
    }
    Ok(image)
}
