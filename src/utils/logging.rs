//! Structured logging and security-focused trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing utilities to prevent
//! the Google API key from leaking into logs or user-facing messages.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

static API_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();
static KEY_PARAM_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Sanitizes Google API keys out of a message.
///
/// Two shapes are covered: bare keys (`AIza` followed by 35 URL-safe
/// characters) and `key=` query parameters, which is how the key travels
/// when it is pasted into an endpoint URL.
pub fn sanitize(input: &str) -> String {
    let api_key = API_KEY_PATTERN
        .get_or_init(|| Regex::new(r"AIza[0-9A-Za-z_\-]{35}").expect("valid api key pattern"));
    let key_param = KEY_PARAM_PATTERN
        .get_or_init(|| Regex::new(r"([?&]key=)[^&\s\x22']+").expect("valid key param pattern"));

    let result = api_key.replace_all(input, "[REDACTED_API_KEY]");
    key_param
        .replace_all(&result, "${1}[REDACTED_API_KEY]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bare_key() {
        let input = "x-goog-api-key: AIzaSyA1234567890abcdefghijklmnopqrstu";
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("AIzaSyA1234567890"));
    }

    #[test]
    fn test_sanitize_query_param() {
        let input = "error sending request for url (https://host/v1beta/models/m:generateContent?key=secret123&alt=json)";
        let output = sanitize(input);
        assert!(output.contains("?key=[REDACTED_API_KEY]&alt=json"));
        assert!(!output.contains("secret123"));
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("Status: FRESH"), "Status: FRESH");
    }
}
