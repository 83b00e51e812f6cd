//! Configuration data structures for the fruit-freshness service.
//!
//! This module defines the schema for the application settings, including
//! server parameters, upstream API endpoints, storage locations and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::fmt;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Gemini vision API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Upstream translation API settings.
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Upload and report directories.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webcam capture settings.
    #[serde(default)]
    pub camera: CameraConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `5000`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the Gemini `generateContent` endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL of the Generative Language API.
    /// Default: `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "default_gemini_base_url")]
    pub api_base_url: String,

    /// Vision-capable model name.
    /// Default: `gemini-2.5-flash`
    #[serde(default = "default_model")]
    pub model: String,

    /// API key. Falls back to `GOOGLE_API_KEY` when left empty.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds.
    /// Default: `30`
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for the MyMemory translation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Full URL of the translation GET endpoint.
    /// Default: `https://api.mymemory.translated.net/get`
    #[serde(default = "default_translation_url")]
    pub api_url: String,

    /// Language the analysis text is produced in.
    /// Default: `en`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Request timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_translation_timeout")]
    pub timeout_seconds: u64,
}

/// Where uploads and rendered reports are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Default: `uploads`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Default: `reports`
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    /// Largest accepted upload in bytes.
    /// Default: 16 MiB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Settings for server-side webcam capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Command line used to grab a single frame. `{output}` is replaced by
    /// the destination path.
    #[serde(default = "default_camera_command")]
    pub command: String,

    /// Seconds to wait for the capture command.
    /// Default: `15`
    #[serde(default = "default_camera_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_gemini_base_url(),
            model: default_model(),
            api_key: String::new(),
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

// Keep the key out of debug output
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: default_translation_url(),
            source_language: default_source_language(),
            timeout_seconds: default_translation_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            reports_dir: default_reports_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: default_camera_command(),
            timeout_seconds: default_camera_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_timeout() -> u64 {
    30
}

fn default_translation_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

fn default_source_language() -> String {
    crate::languages::DEFAULT_LANGUAGE.to_string()
}

fn default_translation_timeout() -> u64 {
    10
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_camera_command() -> String {
    "ffmpeg -y -loglevel error -f v4l2 -i /dev/video0 -frames:v 1 {output}".to_string()
}

fn default_camera_timeout() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
