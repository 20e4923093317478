//! Prompt construction for catalog recommendations.

use askama::Template;
use serde_json::{Value, json};

use kiddiebox_core::Product;

use super::GenerationRequest;

/// Persona given to the model as its system instruction.
pub const SYSTEM_INSTRUCTION: &str = "You are a warm, helpful educational consultant for parents.";

/// Task prompt sent as the single user turn.
#[derive(Template)]
#[template(path = "recommendation/prompt.txt")]
struct RecommendationPrompt<'a> {
    query: &'a str,
    catalog: &'a str,
}

/// One line per product: `ID, Title, Age, Category, Desc`.
#[must_use]
pub fn catalog_context(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "ID: {}, Title: {}, Age: {}, Category: {}, Desc: {}",
                p.id, p.title, p.age_range, p.category, p.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Structured-output schema: `{message: STRING, recommendedIds: [STRING]}`.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "message": {
                "type": "STRING",
                "description": "A friendly recommendation message for the parent."
            },
            "recommendedIds": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of Product IDs that match the query."
            }
        },
        "required": ["message", "recommendedIds"]
    })
}

/// Build the full generation request for `query` over `products`.
///
/// # Errors
///
/// Returns `askama::Error` if the prompt template fails to render.
pub fn build_request(query: &str, products: &[Product]) -> Result<GenerationRequest, askama::Error> {
    let catalog = catalog_context(products);
    let prompt = RecommendationPrompt {
        query,
        catalog: &catalog,
    }
    .render()?;

    Ok(GenerationRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        prompt,
        response_schema: response_schema(),
    })
}
