// Webcam capture
// Author: kelexine (https://github.com/kelexine)

use crate::config::CameraConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Source of a single still frame, written into the upload directory.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn capture(&self, upload_dir: &Path) -> Result<PathBuf>;
}

/// Captures by running an external command (ffmpeg, fswebcam, ...).
///
/// The configured command line is split on whitespace; every `{output}`
/// token is replaced with the destination path.
pub struct CommandCamera {
    config: CameraConfig,
}

impl CommandCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// `captured_YYYYMMDD_HHMMSS.jpg`
    pub fn capture_filename() -> String {
        format!("captured_{}.jpg", chrono::Local::now().format("%Y%m%d_%H%M%S"))
    }

    fn build_command(&self, output: &Path) -> Result<Command> {
        let output = output.to_string_lossy();
        let mut parts = self
            .config
            .command
            .split_whitespace()
            .map(|part| part.replace("{output}", &output));

        let program = parts
            .next()
            .ok_or_else(|| AppError::Camera("no capture command configured".to_string()))?;

        let mut command = Command::new(program);
        command.args(parts).kill_on_drop(true);
        Ok(command)
    }
}

#[async_trait]
impl Camera for CommandCamera {
    async fn capture(&self, upload_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(upload_dir).await?;
        let output = upload_dir.join(Self::capture_filename());
        let mut command = self.build_command(&output)?;

        debug!("Running capture command: {}", self.config.command);
        let result = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            command.output(),
        )
        .await
        .map_err(|_| AppError::Camera("Camera not available (timed out)".to_string()))?
        .map_err(|e| AppError::Camera(format!("could not start capture command: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AppError::Camera(format!(
                "Failed to capture frame ({}): {}",
                result.status,
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(AppError::Camera("Failed to capture frame".to_string()));
        }

        info!("Captured frame to {}", output.display());
        Ok(output)
    }
}
