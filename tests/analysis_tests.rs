// End-to-end analysis tests against a mocked Gemini endpoint
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use fruit_freshness::analysis::{Analyzer, ANALYSIS_PROMPT};
use fruit_freshness::config::{GeminiConfig, TranslationConfig};
use fruit_freshness::gemini::GeminiClient;
use fruit_freshness::translation::Translator;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";
const FAKE_JPEG: &[u8] = b"\xFF\xD8\xFF\xE0fake jpeg body";

fn analyzer_for(server: &ServerGuard) -> Analyzer {
    let gemini = GeminiConfig {
        api_base_url: server.url(),
        api_key: "test-key".to_string(),
        ..GeminiConfig::default()
    };
    let translation = TranslationConfig {
        api_url: format!("{}/get", server.url()),
        ..TranslationConfig::default()
    };
    Analyzer::new(
        GeminiClient::new(&gemini).unwrap(),
        Translator::new(&translation).unwrap(),
    )
}

fn write_image(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, FAKE_JPEG).unwrap();
    path
}

fn reply_with_text(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_missing_file_makes_no_network_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    let analyzer = analyzer_for(&server);
    let result = analyzer
        .analyze(&PathBuf::from("/definitely/not/here.jpg"), "en")
        .await;

    assert_eq!(result, "Analysis result: Image file not found.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_template_reply_is_formatted() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "apple.jpg");
    let encoded = base64::engine::general_purpose::STANDARD.encode(FAKE_JPEG);

    let mut server = Server::new_async().await;
    let gemini = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    { "text": ANALYSIS_PROMPT },
                    { "inline_data": { "mime_type": "image/jpeg", "data": encoded } }
                ]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_with_text(
            "Fruits Found: Apple\nStatus: FRESH\nConfidence: 92%\nQuality: Good",
        ))
        .expect(1)
        .create_async()
        .await;
    let translation = server
        .mock("GET", "/get")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = analyzer_for(&server).analyze(&image, "en").await;

    assert!(result.starts_with("📊 <strong>Analysis Result:</strong>"));
    assert!(result.contains("✅ <strong>Status:</strong> FRESH"));
    assert!(result.contains("🍎 <strong>Fruits Found:</strong> Apple"));
    assert!(result.contains("🎯 <strong>Confidence Score:</strong> 92%"));
    assert!(result.contains("📝 <strong>Quality Assessment:</strong> Good"));
    gemini.assert_async().await;
    translation.assert_async().await;
}

#[tokio::test]
async fn test_non_fruit_reply_falls_back_to_raw_text() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "cat.jpg");
    let raw = "This image shows a cat. There are no fruits visible.";

    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(reply_with_text(raw))
        .create_async()
        .await;
    let translation = server
        .mock("GET", "/get")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let result = analyzer_for(&server).analyze(&image, "en").await;

    assert_eq!(result, format!("📊 <strong>Analysis Result:</strong>\n\n{}", raw));
    translation.assert_async().await;
}

#[tokio::test]
async fn test_result_is_translated_for_other_languages() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "banana.png");

    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex(r#""mime_type":"image/png""#.to_string()))
        .with_status(200)
        .with_body(reply_with_text("Status: ROTTEN"))
        .create_async()
        .await;
    let translation = server
        .mock("GET", "/get")
        .match_query(Matcher::UrlEncoded("langpair".into(), "en|es".into()))
        .with_status(200)
        .with_body(r#"{"responseStatus":200,"responseData":{"translatedText":"Estado: PODRIDO"}}"#)
        .expect(1)
        .create_async()
        .await;

    let result = analyzer_for(&server).analyze(&image, "es").await;

    assert_eq!(result, "Estado: PODRIDO");
    translation.assert_async().await;
}

#[tokio::test]
async fn test_upstream_status_mapping() {
    let cases: [(usize, &str, &str); 6] = [
        (
            400,
            r#"{"error":{"code":400,"message":"Unable to process input image.","status":"INVALID_ARGUMENT"}}"#,
            "Analysis result: Invalid request - Unable to process input image.",
        ),
        (401, "{}", "Analysis result: API key is invalid. Please check your GOOGLE_API_KEY configuration."),
        (403, "{}", "Analysis result: API access denied. Make sure the Generative Language API is enabled."),
        (429, "{}", "Analysis result: API rate limit exceeded. Please try again later."),
        (500, "{}", "Analysis result: Server error. Please try again later."),
        (503, "{}", "Analysis result: API error (Status 503). Please try again."),
    ];

    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "pear.jpg");

    for (status, body, expected) in cases {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let result = analyzer_for(&server).analyze(&image, "en").await;
        assert_eq!(result, expected, "status {}", status);
    }
}

#[tokio::test]
async fn test_invalid_key_message_does_not_leak_key() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "kiwi.jpg");

    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(401)
        .with_body(r#"{"error":{"message":"API key not valid: test-key"}}"#)
        .create_async()
        .await;

    let result = analyzer_for(&server).analyze(&image, "en").await;
    assert!(!result.contains("test-key"));
}

#[tokio::test]
async fn test_malformed_success_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "plum.jpg");

    for body in [r#"{"candidates":[]}"#, "not json at all", r#"{"candidates":[{"finishReason":"SAFETY"}]}"#] {
        let mut server = Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let result = analyzer_for(&server).analyze(&image, "en").await;
        assert_eq!(result, "Analysis result: Could not parse API response. Try again.");
    }
}

#[tokio::test]
async fn test_connection_failure_message() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "fig.jpg");

    let gemini = GeminiConfig {
        // Nothing listens on port 1
        api_base_url: "http://127.0.0.1:1".to_string(),
        api_key: "test-key".to_string(),
        ..GeminiConfig::default()
    };
    let analyzer = Analyzer::new(
        GeminiClient::new(&gemini).unwrap(),
        Translator::new(&TranslationConfig::default()).unwrap(),
    );

    let result = analyzer.analyze(&image, "en").await;
    assert_eq!(
        result,
        "Analysis result: Connection error. Please check your internet connection."
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_upstream_is_a_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir, "mango.jpg");

    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(reply_with_text("Status: FRESH").as_bytes())
        })
        .create_async()
        .await;

    let gemini = GeminiConfig {
        api_base_url: server.url(),
        api_key: "test-key".to_string(),
        timeout_seconds: 1,
        ..GeminiConfig::default()
    };
    let analyzer = Analyzer::new(
        GeminiClient::new(&gemini).unwrap(),
        Translator::new(&TranslationConfig::default()).unwrap(),
    );

    let result = analyzer.analyze(&image, "en").await;
    assert_eq!(
        result,
        "Analysis result: Request timeout. The API took too long to respond. Please try again."
    );
}

#[tokio::test]
async fn test_unreadable_image_is_an_unknown_error() {
    let dir = tempfile::tempdir().unwrap();

    let mut server = Server::new_async().await;
    let gemini = server
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    // A directory exists but cannot be read as an image
    let result = analyzer_for(&server).analyze(dir.path(), "en").await;

    assert!(result.starts_with("Analysis result: Error - "), "{}", result);
    gemini.assert_async().await;
}
