//! LLM: the model behind card suggestions.
//!
//! DESIGN
//! ======
//! One provider, Gemini, configured from environment variables. Routes talk
//! to it through the [`types::SuggestionProvider`] trait so tests can swap in
//! a fake.

pub mod config;
pub mod gemini;
pub mod types;

use config::GeminiConfig;
use gemini::GeminiClient;
use types::LlmError;

/// Build the Gemini client from environment variables.
///
/// # Errors
///
/// Returns an error if no API key is configured or the HTTP client fails.
pub fn client_from_env() -> Result<GeminiClient, LlmError> {
    GeminiClient::new(GeminiConfig::from_env()?)
}
