//! AI-powered catalog recommendations.
//!
//! A parent describes their child in free text; the recommendation client
//! asks a generative model to pick matching products from the catalog and
//! write a short message.
//!
//! The client never fails from the caller's point of view:
//!
//! - No API key configured: a fixed simulated-mode message, no network call
//! - Model or network failure: a fixed apology, logged with `tracing::error!`
//! - Model answer without a message: a fixed "no specific match" message
//!
//! Returned product IDs are passed through unvalidated.

mod client;
mod error;
pub mod prompt;
mod types;

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use kiddiebox_core::{Product, ProductId};

use crate::config::{GeminiConfig, usable_key};

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, GeminiError};
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// Reply used when no API key is configured.
pub const SIMULATED_MODE_MESSAGE: &str =
    "I can help you find courses, but I need my API key first! (Simulated Mode)";

/// Reply used when the model call fails for any reason.
pub const APOLOGY_MESSAGE: &str = "Oops! My brain is taking a nap. Please try searching manually.";

/// Reply used when the model answers without a message.
pub const NO_MATCH_MESSAGE: &str =
    "I couldn't find a specific match, but feel free to browse our catalog!";

/// A recommendation answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Friendly message for the parent.
    pub message: String,
    /// Recommended product IDs, as returned by the model.
    pub recommended_ids: Vec<ProductId>,
}

impl Recommendation {
    fn fallback(message: &str) -> Self {
        Self {
            message: message.to_string(),
            recommended_ids: Vec::new(),
        }
    }
}

/// A model-agnostic structured generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instruction.
    pub system_instruction: String,
    /// User prompt.
    pub prompt: String,
    /// Schema the JSON output must follow.
    pub response_schema: serde_json::Value,
}

/// A generative model that answers with JSON text.
pub trait GenerativeModel: Send + Sync {
    /// Generate JSON text for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be reached or refuses to answer.
    fn generate_json(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GeminiError>> + Send;
}

/// Model output before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelAnswer {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    recommended_ids: Option<Vec<ProductId>>,
}

/// Recommendation client with fallback handling.
///
/// Without a model the client runs in simulated mode.
#[derive(Clone)]
pub struct RecommendationClient<M = GeminiClient> {
    model: Option<M>,
}

impl RecommendationClient<GeminiClient> {
    /// Build a Gemini-backed client, or a simulated one if no usable API key
    /// is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let Some(key) = usable_key(config.api_key.as_ref()) else {
            info!("No Gemini API key configured, recommendations run in simulated mode");
            return Ok(Self::simulated());
        };
        let client = GeminiClient::new(key, &config.model, &config.base_url)?;
        Ok(Self::with_model(client))
    }
}

impl<M: GenerativeModel> RecommendationClient<M> {
    /// A client with no model.
    #[must_use]
    pub const fn simulated() -> Self {
        Self { model: None }
    }

    /// A client backed by `model`.
    #[must_use]
    pub const fn with_model(model: M) -> Self {
        Self { model: Some(model) }
    }

    /// Whether the client answers without calling a model.
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        self.model.is_none()
    }

    /// Recommend products from `catalog` for a free-text `query`.
    ///
    /// Never fails: see the module docs for the fallback messages.
    #[instrument(skip(self, catalog), fields(products = catalog.len()))]
    pub async fn recommend(&self, query: &str, catalog: &[Product]) -> Recommendation {
        let Some(model) = &self.model else {
            return Recommendation::fallback(SIMULATED_MODE_MESSAGE);
        };

        match Self::ask(model, query, catalog).await {
            Ok(recommendation) => recommendation,
            Err(e) => {
                error!(error = %e, "Recommendation request failed");
                Recommendation::fallback(APOLOGY_MESSAGE)
            }
        }
    }

    async fn ask(model: &M, query: &str, catalog: &[Product]) -> Result<Recommendation, GeminiError> {
        let request = prompt::build_request(query, catalog)?;
        let text = model.generate_json(&request).await?;
        parse_answer(&text)
    }
}

/// Apply defaults to the model's JSON answer. Blank text reads as `{}`.
fn parse_answer(text: &str) -> Result<Recommendation, GeminiError> {
    let answer: ModelAnswer = if text.trim().is_empty() {
        ModelAnswer::default()
    } else {
        serde_json::from_str(text)
            .map_err(|e| GeminiError::Parse(format!("Model answer is not valid JSON: {e}")))?
    };

    Ok(Recommendation {
        message: answer
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_MATCH_MESSAGE.to_string()),
        recommended_ids: answer.recommended_ids.unwrap_or_default(),
    })
}
