// MyMemory translation API wire types
// Author: kelexine (https://github.com/kelexine)

use serde::Deserialize;
use serde_json::Value;

/// Response of `GET /get?q=..&langpair=..`.
///
/// `responseStatus` is a number on success but the service sends strings
/// (e.g. `"403"`) for some errors, so it is kept loosely typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    #[serde(default)]
    pub response_status: Value,

    #[serde(default)]
    pub response_data: Option<TranslationData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationData {
    #[serde(default)]
    pub translated_text: Option<String>,
}

impl TranslationResponse {
    /// Translated text, only when the service reported status 200.
    pub fn translated_text(&self) -> Option<&str> {
        if self.response_status.as_i64() != Some(200) {
            return None;
        }
        self.response_data.as_ref()?.translated_text.as_deref()
    }
}
