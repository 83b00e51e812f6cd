//! Turns the vision model's free-text reply into labeled, icon-annotated sections.
//!
//! The model is asked to answer in a four-line template, but nothing enforces
//! it. Lines are matched against a small set of field markers; whatever does
//! not match is dropped. A reply with no recognizable markers is passed
//! through verbatim under the generic header so the caller never receives an
//! empty result.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use std::fmt;

/// Header every rendered result starts with.
pub const RESULT_HEADER: &str = "📊 <strong>Analysis Result:</strong>";

/// A field of the reply template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FruitsFound,
    Status,
    Confidence,
    Quality,
}

/// Marker table, checked top to bottom. The first prefix that matches wins.
const MARKERS: &[(&str, Field)] = &[
    ("Fruits Found:", Field::FruitsFound),
    ("Fruits found:", Field::FruitsFound),
    ("Status:", Field::Status),
    ("Freshness:", Field::Status),
    ("Confidence:", Field::Confidence),
    ("Quality:", Field::Quality),
    ("Assessment:", Field::Quality),
];

impl Field {
    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Field::FruitsFound => "Fruits Found",
            Field::Status => "Status",
            Field::Confidence => "Confidence Score",
            Field::Quality => "Quality Assessment",
        }
    }

    /// Match a trimmed line against the marker table, returning the field and
    /// the trimmed value after the marker.
    pub fn parse_line(line: &str) -> Option<(Field, &str)> {
        MARKERS.iter().find_map(|(prefix, field)| {
            line.strip_prefix(prefix).map(|value| (*field, value.trim()))
        })
    }
}

/// Verdict derived from the Status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Rotten,
    Unknown,
}

impl Freshness {
    /// Case-insensitive keyword search. Fresh keywords are checked first, so a
    /// value mentioning both verdicts counts as fresh.
    pub fn classify(status: &str) -> Self {
        let upper = status.to_uppercase();
        if upper.contains("FRESH") || upper.contains("GOOD") {
            Freshness::Fresh
        } else if upper.contains("ROTTEN") || upper.contains("BAD") {
            Freshness::Rotten
        } else {
            Freshness::Unknown
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Freshness::Fresh => "✅",
            Freshness::Rotten => "❌",
            Freshness::Unknown => "ℹ️",
        }
    }
}

/// One recognized line of the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub field: Field,
    pub value: String,
}

impl Section {
    pub fn icon(&self) -> &'static str {
        match self.field {
            Field::FruitsFound => "🍎",
            Field::Status => Freshness::classify(&self.value).icon(),
            Field::Confidence => "🎯",
            Field::Quality => "📝",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <strong>{}:</strong> {}",
            self.icon(),
            self.field.label(),
            self.value
        )
    }
}

/// Parsed reply: recognized sections in input order, plus the raw text for
/// the fallback rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResult {
    sections: Vec<Section>,
    raw: String,
}

impl FormattedResult {
    pub fn parse(raw: &str) -> Self {
        let sections = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(Field::parse_line)
            .map(|(field, value)| Section {
                field,
                value: value.to_string(),
            })
            .collect();

        Self {
            sections,
            raw: raw.to_string(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True when no marker matched and rendering falls back to the raw text.
    pub fn is_unstructured(&self) -> bool {
        self.sections.is_empty()
    }

    /// Verdict of the first Status section, if any.
    pub fn freshness(&self) -> Option<Freshness> {
        self.sections
            .iter()
            .find(|s| s.field == Field::Status)
            .map(|s| Freshness::classify(&s.value))
    }
}

impl fmt::Display for FormattedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n", RESULT_HEADER)?;

        if self.is_unstructured() {
            return f.write_str(&self.raw);
        }

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", section)?;
        }
        f.write_str("\n")
    }
}

/// Format a raw model reply for display.
pub fn format(raw_text: &str) -> String {
    FormattedResult::parse(raw_text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEMPLATE_REPLY: &str =
        "Fruits Found: Apple\nStatus: FRESH\nConfidence: 92%\nQuality: Good";

    #[test]
    fn test_full_template() {
        let output = format(TEMPLATE_REPLY);
        assert_eq!(
            output,
            "📊 <strong>Analysis Result:</strong>\n\n\
             🍎 <strong>Fruits Found:</strong> Apple\n\n\
             ✅ <strong>Status:</strong> FRESH\n\n\
             🎯 <strong>Confidence Score:</strong> 92%\n\n\
             📝 <strong>Quality Assessment:</strong> Good\n"
        );
    }

    #[test]
    fn test_sections_keep_input_order() {
        let result = FormattedResult::parse(
            "Quality: Bruised\nConfidence: 70%\nStatus: ROTTEN\nFruits found: Banana",
        );
        let fields: Vec<Field> = result.sections().iter().map(|s| s.field).collect();
        assert_eq!(
            fields,
            vec![Field::Quality, Field::Confidence, Field::Status, Field::FruitsFound]
        );
    }

    #[test]
    fn test_unstructured_reply_falls_back_to_raw() {
        let raw = "This image shows a cat sitting on a sofa.\nNo fruit is visible.";
        let output = format(raw);
        assert_eq!(
            output,
            format!("📊 <strong>Analysis Result:</strong>\n\n{}", raw)
        );
    }

    #[test]
    fn test_empty_reply_still_has_header() {
        assert_eq!(format(""), "📊 <strong>Analysis Result:</strong>\n\n");
    }

    #[test]
    fn test_status_tie_break_prefers_fresh() {
        assert_eq!(Freshness::classify("FRESH and BAD"), Freshness::Fresh);
        assert_eq!(Freshness::classify("bad"), Freshness::Rotten);
        assert_eq!(Freshness::classify("Rotten"), Freshness::Rotten);
        assert_eq!(Freshness::classify("good"), Freshness::Fresh);
        assert_eq!(Freshness::classify("unclear"), Freshness::Unknown);
    }

    #[test]
    fn test_freshness_alias_and_icons() {
        let output = format("Freshness: bad\nStatus: mixed");
        assert!(output.contains("❌ <strong>Status:</strong> bad"));
        assert!(output.contains("ℹ️ <strong>Status:</strong> mixed"));
    }

    #[test]
    fn test_verdict_comes_from_first_status() {
        assert_eq!(
            FormattedResult::parse("Fruits Found: Pear\nFreshness: bad\nStatus: FRESH").freshness(),
            Some(Freshness::Rotten)
        );
        assert_eq!(FormattedResult::parse("Fruits Found: Pear").freshness(), None);
        assert_eq!(FormattedResult::parse("no markers here").freshness(), None);
    }

    #[test]
    fn test_duplicates_and_empty_values_are_kept() {
        let result = FormattedResult::parse("Status: FRESH\nStatus:\n  \nAssessment: ok");
        assert_eq!(result.sections().len(), 3);
        assert_eq!(result.sections()[1].value, "");
        assert_eq!(result.sections()[2].field, Field::Quality);
    }

    #[test]
    fn test_unmatched_lines_dropped() {
        let output = format("Here is my analysis:\nStatus: FRESH\nThanks!");
        assert!(!output.contains("Here is my analysis"));
        assert!(!output.contains("Thanks!"));
        assert!(output.contains("Status:</strong> FRESH"));
    }

    #[test]
    fn test_prefix_match_is_case_sensitive() {
        let result = FormattedResult::parse("status: FRESH\nCONFIDENCE: 80%");
        assert!(result.is_unstructured());
    }

    #[test]
    fn test_lines_are_trimmed_before_matching() {
        let result = FormattedResult::parse("   Confidence:   85%   ");
        assert_eq!(result.sections()[0].value, "85%");
        assert_eq!(result.freshness(), None);
    }

    proptest! {
        #[test]
        fn prop_output_never_empty(raw in ".*") {
            let output = format(&raw);
            prop_assert!(output.starts_with(RESULT_HEADER));
        }

        #[test]
        fn prop_four_markers_give_four_sections(
            fruit in "[A-Za-z ]{0,20}",
            status in "[A-Za-z ]{0,20}",
            confidence in "[0-9]{1,3}%",
            quality in "[A-Za-z ]{0,20}",
        ) {
            let raw = format!(
                "Fruits Found: {}\nStatus: {}\nConfidence: {}\nQuality: {}",
                fruit, status, confidence, quality
            );
            let result = FormattedResult::parse(&raw);
            let fields: Vec<Field> = result.sections().iter().map(|s| s.field).collect();
            prop_assert_eq!(
                fields,
                vec![Field::FruitsFound, Field::Status, Field::Confidence, Field::Quality]
            );
        }
    }
}
