// Supported output languages
// Author: kelexine (https://github.com/kelexine)

use phf::phf_ordered_map;
use serde::ser::{Serialize, Serializer};

/// Language the vision model answers in; results in this language are never translated.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Language code → display name, in the order the UI lists them.
pub static SUPPORTED_LANGUAGES: phf::OrderedMap<&'static str, &'static str> = phf_ordered_map! {
    "en" => "English",
    "es" => "Español",
    "fr" => "Français",
    "de" => "Deutsch",
    "it" => "Italiano",
    "pt" => "Português",
    "ru" => "Русский",
    "ja" => "日本語",
    "zh" => "中文",
    "hi" => "हिन्दी",
    "ar" => "العربية",
    "ko" => "한국어",
    "tr" => "Türkçe",
    "pl" => "Polski",
    "nl" => "Nederlands",
    "sv" => "Svenska",
    "th" => "ไทย",
    "vi" => "Tiếng Việt",
    "id" => "Bahasa Indonesia",
    "el" => "Ελληνικά",
    "gu" => "ગુજરાતી",
};

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains_key(code)
}

pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES.get(code).copied()
}

/// Serializes the table as a JSON object, keeping declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageTable;

impl Serialize for LanguageTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(SUPPORTED_LANGUAGES.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 21);
        assert!(is_supported(DEFAULT_LANGUAGE));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(display_name("es"), Some("Español"));
        assert_eq!(display_name("gu"), Some("ગુજરાતી"));
        assert_eq!(display_name("xx"), None);
        assert!(!is_supported("EN"));
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let json = serde_json::to_string(&LanguageTable).unwrap();
        assert!(json.starts_with(r#"{"en":"English","es":"Español""#));
        assert!(json.ends_with(r#""gu":"ગુજરાતી"}"#));
    }
}
