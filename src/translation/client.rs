// Best-effort translation client (MyMemory)
// Author: kelexine (https://github.com/kelexine)

use crate::config::TranslationConfig;
use crate::error::{AppError, Result};
use crate::languages;
use crate::models::translation::TranslationResponse;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Translates analysis text out of the source language.
///
/// Translation never fails from the caller's point of view: any problem is
/// logged and the input text is returned untouched.
pub struct Translator {
    http_client: Client,
    config: TranslationConfig,
}

impl Translator {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Translate `text` into `target`, falling back to `text` on any failure.
    ///
    /// No request is made when `target` is the source language or is not in
    /// the supported language table.
    pub async fn translate(&self, text: &str, target: &str) -> String {
        if target == self.config.source_language {
            crate::metrics::record_translation("skipped");
            return text.to_string();
        }

        if !languages::is_supported(target) {
            warn!("Skipping translation to unsupported language '{}'", target);
            crate::metrics::record_translation("skipped");
            return text.to_string();
        }

        match self.request_translation(text, target).await {
            Ok(translated) => {
                crate::metrics::record_translation("translated");
                translated
            }
            Err(e) => {
                warn!("Translation to '{}' failed, keeping original text: {}", target, e);
                crate::metrics::record_translation("fallback");
                text.to_string()
            }
        }
    }

    async fn request_translation(&self, text: &str, target: &str) -> Result<String> {
        let langpair = format!("{}|{}", self.config.source_language, target);
        debug!("Requesting translation with langpair {}", langpair);

        let response = self
            .http_client
            .get(&self.config.api_url)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(AppError::Translation(format!("HTTP {}", status)));
        }

        let body: TranslationResponse = response
            .json()
            .await
            .map_err(|e| AppError::Translation(format!("Invalid response: {}", e)))?;

        body.translated_text()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Translation(format!(
                    "Service reported status {}",
                    body.response_status
                ))
            })
    }
}
