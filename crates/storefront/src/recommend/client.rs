//! Gemini API client for structured JSON generation.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use super::{GenerationRequest, GenerativeModel};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

/// Gemini API client.
///
/// Sends one-shot `generateContent` requests that ask for JSON output
/// constrained by a response schema.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
    endpoint: Url,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key, sent as the `x-goog-api-key` header
    /// * `model` - Model ID (e.g. `gemini-2.5-flash`)
    /// * `base_url` - API root
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::Setup` if the API key contains invalid header
    /// characters or the endpoint URL cannot be built, and
    /// `GeminiError::Http` if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, base_url: &Url) -> Result<Self, GeminiError> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| GeminiError::Setup("API key contains invalid header characters".to_string()))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME_TYPE));
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: model.to_string(),
                endpoint: endpoint(base_url, model)?,
            }),
        })
    }

    /// The model this client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a generation request and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with an error
    /// status, or the response body cannot be parsed.
    #[instrument(skip(self, request), fields(model = %self.inner.model))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GeminiError> {
        let body = GenerateContentRequest {
            system_instruction: Content::system(request.system_instruction.as_str()),
            contents: vec![Content::user(request.prompt.as_str())],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: request.response_schema.clone(),
            },
        };

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle a response, extracting the candidate text on success.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let parsed: GenerateContentResponse = serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;
            let text = parsed.text().ok_or(GeminiError::EmptyResponse)?;
            debug!(model = %self.inner.model, bytes = text.len(), "Gemini response received");
            Ok(text)
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_error_body(status, body),
            Err(e) => GeminiError::Http(e),
        }
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String, GeminiError> {
        self.generate(request).await
    }
}

/// `{base}/v1beta/models/{model}:generateContent`
fn endpoint(base_url: &Url, model: &str) -> Result<Url, GeminiError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("v1beta/models/{model}:generateContent"))
        .map_err(|e| GeminiError::Setup(format!("invalid endpoint for model '{model}': {e}")))
}

/// Classify a non-success response body.
fn parse_error_body(status: reqwest::StatusCode, body: String) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => GeminiError::Api {
            status: if api_error.error.status.is_empty() {
                status.to_string()
            } else {
                api_error.error.status
            },
            message: api_error.error.message,
        },
        Err(_) => GeminiError::Api {
            status: status.to_string(),
            message: body,
        },
    }
}
