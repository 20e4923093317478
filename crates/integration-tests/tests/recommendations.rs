//! Integration tests for the Gemini-backed recommendation client.
//!
//! Each test points the real HTTP client at a local mock server.

use axum::http::{Method, StatusCode};
use secrecy::SecretString;

use kiddiebox_core::ProductId;
use kiddiebox_integration_tests::MockGemini;
use kiddiebox_storefront::config::GeminiConfig;
use kiddiebox_storefront::db::seed::default_products;
use kiddiebox_storefront::recommend::{APOLOGY_MESSAGE, NO_MATCH_MESSAGE, RecommendationClient};

fn config_for(server: &MockGemini) -> GeminiConfig {
    GeminiConfig {
        api_key: Some(SecretString::from("test-key-123")),
        model: "gemini-2.5-flash".to_string(),
        base_url: server.base_url().clone(),
    }
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

// =============================================================================
// Successful Requests
// =============================================================================

#[tokio::test]
async fn test_request_shape_and_answer() {
    let body = candidate_body(r#"{"message": "Little Picasso is perfect!", "recommendedIds": ["c3"]}"#);
    let mut server = MockGemini::start(StatusCode::OK, &[], &body).await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();
    assert!(!client.is_simulated());

    let rec = client
        .recommend("my 5 year old loves drawing", &default_products())
        .await;
    assert_eq!(rec.message, "Little Picasso is perfect!");
    assert_eq!(rec.recommended_ids, vec![ProductId::new("c3")]);

    let request = server.received().await;
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(request.header("x-goog-api-key"), Some("test-key-123"));
    assert_eq!(request.header("content-type"), Some("application/json"));

    let payload = request.json();
    assert_eq!(
        payload["systemInstruction"]["parts"][0]["text"],
        "You are a warm, helpful educational consultant for parents."
    );
    assert_eq!(payload["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(
        payload["generationConfig"]["responseSchema"]["required"],
        serde_json::json!(["message", "recommendedIds"])
    );
    let prompt = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("User Query: \"my 5 year old loves drawing\""));
    assert!(prompt.contains("ID: d2, Title: Storytime Starter Pack (E-book)"));
}

#[tokio::test]
async fn test_missing_fields_get_defaults() {
    let server = MockGemini::start(StatusCode::OK, &[], &candidate_body("{}")).await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("anything", &default_products()).await;
    assert_eq!(rec.message, NO_MATCH_MESSAGE);
    assert!(rec.recommended_ids.is_empty());
}

#[tokio::test]
async fn test_unknown_ids_pass_through_client() {
    let body = candidate_body(r#"{"message": "Try these", "recommendedIds": ["c1", "zz9"]}"#);
    let server = MockGemini::start(StatusCode::OK, &[], &body).await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("phonics", &default_products()).await;
    assert_eq!(
        rec.recommended_ids,
        vec![ProductId::new("c1"), ProductId::new("zz9")]
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_rate_limited_yields_apology() {
    let server = MockGemini::start(
        StatusCode::TOO_MANY_REQUESTS,
        &[("retry-after", "30")],
        r#"{"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}}"#,
    )
    .await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("coding", &default_products()).await;
    assert_eq!(rec.message, APOLOGY_MESSAGE);
    assert!(rec.recommended_ids.is_empty());
}

#[tokio::test]
async fn test_api_error_yields_apology() {
    let server = MockGemini::start(
        StatusCode::BAD_REQUEST,
        &[],
        r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#,
    )
    .await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("coding", &default_products()).await;
    assert_eq!(rec.message, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn test_blocked_prompt_yields_apology() {
    let server = MockGemini::start(
        StatusCode::OK,
        &[],
        r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#,
    )
    .await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("coding", &default_products()).await;
    assert_eq!(rec.message, APOLOGY_MESSAGE);
}

#[tokio::test]
async fn test_non_json_answer_yields_apology() {
    let server = MockGemini::start(StatusCode::OK, &[], &candidate_body("Here are some ideas!")).await;
    let client = RecommendationClient::from_config(&config_for(&server)).unwrap();

    let rec = client.recommend("coding", &default_products()).await;
    assert_eq!(rec.message, APOLOGY_MESSAGE);
}

#[test]
fn test_blank_key_is_simulated() {
    let config = GeminiConfig {
        api_key: Some(SecretString::from("   ")),
        ..GeminiConfig::simulated()
    };
    let client = RecommendationClient::from_config(&config).unwrap();
    assert!(client.is_simulated());
}
