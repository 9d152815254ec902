//! LLM types: the provider error and the text-generation seam.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while asking a model for card content.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// None of the accepted API key environment variables is set.
    #[error("missing API key: none of {vars} is set")]
    MissingApiKey { vars: String },

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider answered without any candidate text.
    #[error("empty response from model")]
    EmptyCandidate,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// PROVIDER TRAIT
// =============================================================================

/// Anything that can turn a prompt into raw model text. Enables fakes in tests.
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Send `prompt` and return the first candidate's text, untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider answers
    /// with an error status, or the answer carries no text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
