// Gemini vision API client
// Author: kelexine (https://github.com/kelexine)

use crate::config::GeminiConfig;
use crate::error::{AnalysisFailure, AppError, Result};
use crate::models::gemini::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::logging::sanitize;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the Gemini `generateContent` endpoint.
///
/// The API key travels in the `x-goog-api-key` header rather than the URL,
/// so transport errors (which echo the URL) never carry it.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with the configured request timeout.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            "Created Gemini client for model {} (timeout {}s)",
            config.model, config.timeout_seconds
        );

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Whether an API key is configured at all
    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Call `generateContent` and return the reply text.
    ///
    /// Only HTTP 200 counts as success; every other outcome is mapped to an
    /// [`AnalysisFailure`].
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> std::result::Result<String, AnalysisFailure> {
        let url = self.endpoint();
        debug!("Calling generateContent for model: {}", self.config.model);

        let start = Instant::now();
        let mut builder = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        if self.has_api_key() {
            builder = builder.header("x-goog-api-key", &self.config.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            crate::metrics::record_gemini_call(&self.config.model, 0, start.elapsed().as_secs_f64());
            error!("Gemini request failed: {}", sanitize(&e.to_string()));
            AnalysisFailure::from_transport(&e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Gemini response body: {}", sanitize(&e.to_string()));
            AnalysisFailure::from_transport(&e)
        })?;
        crate::metrics::record_gemini_call(&self.config.model, status, start.elapsed().as_secs_f64());

        if status != 200 {
            error!("Gemini API error: HTTP {} - {}", status, sanitize(&body));
            return Err(AnalysisFailure::from_status(status, &body));
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            body.chars().take(500).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AnalysisFailure::Parse
        })?;

        parsed.first_text().map(str::to_string).ok_or_else(|| {
            error!("Gemini response has no candidate text");
            AnalysisFailure::Parse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_format() {
        let config = GeminiConfig {
            api_base_url: "https://example.test/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!client.has_api_key());
    }
}
