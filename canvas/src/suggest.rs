//! AI card suggestions and gallery templates.
//!
//! The suggestion service lives outside the editor; this module only knows
//! the record it answers with, how to build the prompt it is sent, and how to
//! read its (sometimes markdown-fenced) JSON reply. Applying a suggestion is
//! done by [`crate::engine::EngineCore::apply_suggestion`].

#[cfg(test)]
#[path = "suggest_test.rs"]
mod suggest_test;

use serde::{Deserialize, Serialize};

/// Structured content returned by the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSuggestion {
    pub headline: String,
    pub description: String,
    pub headline_color: String,
    pub description_color: String,
    /// Hex color or gradient string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Search term for a background photo. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_image_keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SuggestionError {
    #[error("empty suggestion")]
    Empty,
    #[error("invalid suggestion JSON: {0}")]
    Parse(String),
}

/// Fonts the model is allowed to pick from.
const PROMPT_FONTS: &str =
    "'Inter, sans-serif', 'Playfair Display, serif', 'Montserrat, sans-serif', 'Roboto, sans-serif'";

/// Full prompt sent to the model for a user request.
#[must_use]
pub fn card_prompt(user_prompt: &str) -> String {
    format!(
        "\nYou are an AI assistant specialized in designing Instagram cards/posts.\n\
         Based on the user's request, generate a JSON object with the following fields:\n\
         - headline: A catchy, short title (max 5 words).\n\
         - description: A persuasive body text (max 20 words).\n\
         - headlineColor: A hex color code compatible with the background.\n\
         - descriptionColor: A hex color code compatible with the background.\n\
         - backgroundColor: A hex color or linear-gradient string that fits the theme.\n\
         - fontFamily: One of these: {PROMPT_FONTS}.\n\
         - suggestedImageKeyword: A keyword to search for a background image (e.g., \"coffee\", \"sunset\", \"business\").\n\
         \n\
         User Request: \"{user_prompt}\"\n\
         \n\
         Return ONLY the JSON object. Do not include markdown formatting like ```json.\n"
    )
}

/// User request derived from an Instagram post URL or caption.
#[must_use]
pub fn instagram_prompt(url_or_caption: &str) -> String {
    format!("Extract context from this Instagram URL/Caption and create a card: {}", url_or_caption.trim())
}

/// Remove markdown code fences the model sometimes wraps JSON in.
#[must_use]
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

/// Parse the model's text answer into a suggestion.
///
/// # Errors
///
/// [`SuggestionError::Empty`] for blank text, [`SuggestionError::Parse`] when
/// the unfenced text is not a valid suggestion record.
pub fn parse_suggestion(text: &str) -> Result<AiSuggestion, SuggestionError> {
    let json = strip_fences(text);
    if json.is_empty() {
        return Err(SuggestionError::Empty);
    }
    serde_json::from_str(&json).map_err(|e| SuggestionError::Parse(e.to_string()))
}

/// A gallery template: a format and an optional background photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub title: String,
    pub category: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
