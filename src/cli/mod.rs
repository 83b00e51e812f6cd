// CLI module for fruit-freshness
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// fruit-freshness - Fruit freshness analysis with the Gemini vision API
#[derive(Parser, Debug)]
#[command(name = "fruit-freshness", version, about, long_about = None)]
pub struct Args {
    /// Analyze one image, print the result and exit instead of serving HTTP
    #[arg(long, value_name = "IMAGE")]
    pub analyze: Option<PathBuf>,

    /// Result language code (see /api/languages)
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Also write a PDF report of the one-shot analysis
    #[arg(long, value_name = "PDF", requires = "analyze")]
    pub report: Option<PathBuf>,

    /// Config file (default: ~/.fruit-freshness/config.toml)
    #[arg(long, env = "FRUIT_FRESHNESS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_server_mode() {
        let args = Args::try_parse_from(["fruit-freshness"]).unwrap();
        assert!(args.analyze.is_none());
        assert_eq!(args.language, "en");
    }

    #[test]
    fn test_report_requires_analyze() {
        assert!(Args::try_parse_from(["fruit-freshness", "--report", "out.pdf"]).is_err());
        let args = Args::try_parse_from([
            "fruit-freshness",
            "--analyze",
            "apple.jpg",
            "--language",
            "fr",
            "--report",
            "out.pdf",
        ])
        .unwrap();
        assert_eq!(args.language, "fr");
        assert_eq!(args.report, Some(PathBuf::from("out.pdf")));
    }
}
