// Error types for fruit-freshness
// Author: kelexine (https://github.com/kelexine)

use crate::utils::logging::sanitize;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Prefix shared by every user-facing analysis message.
pub const ANALYSIS_MESSAGE_PREFIX: &str = "Analysis result: ";

/// Errors raised by the application plumbing (config, intake, reports, HTTP).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Camera capture failed: {0}")]
    Camera(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convert AppError to HTTP responses for Axum
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            AppError::Config(_) | AppError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::Camera(_) => (StatusCode::INTERNAL_SERVER_ERROR, "camera_error"),
            AppError::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, "report_error"),
            AppError::Http(_) => (StatusCode::BAD_GATEWAY, "api_error"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": sanitize(&self.to_string()),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Every way an analysis can fail, as seen by the person who asked for it.
///
/// The `#[error]` strings are the single source of user-facing wording;
/// [`AnalysisFailure::user_message`] adds the shared prefix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    #[error("Image file not found.")]
    FileNotFound,

    #[error("Could not parse API response. Try again.")]
    Parse,

    #[error("Invalid request - {0}")]
    InvalidRequest(String),

    #[error("API key is invalid. Please check your GOOGLE_API_KEY configuration.")]
    InvalidApiKey,

    #[error("API access denied. Make sure the Generative Language API is enabled.")]
    AccessDenied,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Server error. Please try again later.")]
    ServerError,

    #[error("API error (Status {0}). Please try again.")]
    UnexpectedStatus(u16),

    #[error("Request timeout. The API took too long to respond. Please try again.")]
    Timeout,

    #[error("Connection error. Please check your internet connection.")]
    Connection,

    #[error("Error - {0}")]
    Unknown(String),
}

impl AnalysisFailure {
    /// Map a non-200 upstream status to its failure.
    ///
    /// `body` is only consulted for 400, whose upstream message is passed through.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            400 => AnalysisFailure::InvalidRequest(
                extract_error_message(body).unwrap_or_else(|| "Bad request".to_string()),
            ),
            401 => AnalysisFailure::InvalidApiKey,
            403 => AnalysisFailure::AccessDenied,
            429 => AnalysisFailure::RateLimited,
            500 => AnalysisFailure::ServerError,
            other => AnalysisFailure::UnexpectedStatus(other),
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisFailure::Timeout
        } else if err.is_connect() {
            AnalysisFailure::Connection
        } else {
            AnalysisFailure::Unknown(sanitize(&err.to_string()))
        }
    }

    /// Taxonomy label, used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisFailure::FileNotFound => "file_not_found",
            AnalysisFailure::Parse => "parse_error",
            AnalysisFailure::InvalidRequest(_)
            | AnalysisFailure::InvalidApiKey
            | AnalysisFailure::AccessDenied
            | AnalysisFailure::RateLimited => "upstream_client_error",
            AnalysisFailure::ServerError => "upstream_server_error",
            AnalysisFailure::UnexpectedStatus(status) => match status {
                400..=499 => "upstream_client_error",
                500..=599 => "upstream_server_error",
                _ => "unknown",
            },
            AnalysisFailure::Timeout => "network_timeout",
            AnalysisFailure::Connection => "network_unavailable",
            AnalysisFailure::Unknown(_) => "unknown",
        }
    }

    /// The string handed back to the caller in place of a formatted result.
    pub fn user_message(&self) -> String {
        format!("{}{}", ANALYSIS_MESSAGE_PREFIX, self)
    }
}

/// Extract `error.message` from an upstream JSON error envelope.
pub fn extract_error_message(response_text: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorResponse>(response_text)
        .ok()
        .and_then(|resp| resp.error)
        .and_then(|error| error.message)
}
