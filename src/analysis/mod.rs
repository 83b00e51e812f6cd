//! Fruit freshness analysis pipeline.
//!
//! [`Analyzer::analyze`] reads an image, asks the vision model about it,
//! formats the reply and translates it when another language is requested.
//! It always returns a displayable string: failures come back as
//! `Analysis result: ...` messages built from [`AnalysisFailure`].
//!
//! # Submodules
//!
//! - `formatter`: Free-text reply → labeled sections.
//! - `prompt`: The versioned instruction prompt.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod formatter;
pub mod prompt;

use crate::error::AnalysisFailure;
use crate::gemini::GeminiClient;
use crate::models::gemini::GenerateContentRequest;
use crate::translation::Translator;
use crate::vision::{encode_inline_data, ImageFormat};
use std::path::Path;
use tracing::{debug, info, warn};

pub use formatter::{format, FormattedResult};
pub use prompt::ANALYSIS_PROMPT;

/// One image to analyze, in memory.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: Vec<u8>,
    pub format: ImageFormat,
    pub language: String,
}

impl AnalysisRequest {
    /// Read the image at `path`; the MIME type comes from its extension.
    pub async fn from_path(path: &Path, language: &str) -> Result<Self, AnalysisFailure> {
        if !path.exists() {
            return Err(AnalysisFailure::FileNotFound);
        }

        let image = tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisFailure::Unknown(e.to_string()))?;

        Ok(Self {
            image,
            format: ImageFormat::from_path(path),
            language: language.to_string(),
        })
    }

    /// Build the `generateContent` body: prompt text plus inline image.
    pub fn to_gemini_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::with_image(
            ANALYSIS_PROMPT,
            encode_inline_data(&self.image, self.format),
        )
    }
}

/// Orchestrates vision call, formatting and translation.
pub struct Analyzer {
    vision: GeminiClient,
    translator: Translator,
}

impl Analyzer {
    pub fn new(vision: GeminiClient, translator: Translator) -> Self {
        Self { vision, translator }
    }

    pub fn vision(&self) -> &GeminiClient {
        &self.vision
    }

    /// Analyze the image at `image_path`, answering in `language`.
    ///
    /// Never fails: every failure is rendered as a user-facing message.
    pub async fn analyze(&self, image_path: &Path, language: &str) -> String {
        match self.try_analyze(image_path, language).await {
            Ok(result) => {
                crate::metrics::record_analysis("success");
                result
            }
            Err(failure) => {
                warn!(
                    kind = failure.kind(),
                    "Analysis of {} failed: {}",
                    image_path.display(),
                    failure
                );
                crate::metrics::record_analysis(failure.kind());
                failure.user_message()
            }
        }
    }

    async fn try_analyze(&self, image_path: &Path, language: &str) -> Result<String, AnalysisFailure> {
        let request = AnalysisRequest::from_path(image_path, language).await?;
        info!(
            "Analyzing {} ({}, {} bytes, prompt v{}, language {})",
            image_path.display(),
            request.format.mime_type(),
            request.image.len(),
            prompt::PROMPT_VERSION,
            request.language
        );

        let raw = self.vision.generate_content(&request.to_gemini_request()).await?;

        let parsed = FormattedResult::parse(&raw);
        match parsed.freshness() {
            Some(verdict) => debug!("Reply parsed into {} sections, verdict {:?}", parsed.sections().len(), verdict),
            None if parsed.is_unstructured() => {
                debug!("Reply had no recognized field markers, passing raw text through")
            }
            None => debug!("Reply parsed without a Status section"),
        }
        let formatted = parsed.to_string();

        Ok(self.translator.translate(&formatted, &request.language).await)
    }
}
