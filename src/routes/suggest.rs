//! `POST /api/gemini`: card content suggestions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use canvas::suggest::{self, AiSuggestion};
use serde_json::Value;

use crate::llm::types::LlmError;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Ask the model for a card matching `{ "prompt": ... }` and answer with the
/// parsed suggestion record.
pub async fn generate(State(state): State<AppState>, Json(body): Json<Value>) -> Result<Json<AiSuggestion>, ApiError> {
    let Some(provider) = state.suggester.as_ref() else {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Gemini key not configured"));
    };

    let prompt = body.get("prompt").and_then(Value::as_str).unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "prompt é obrigatório"));
    }

    let text = provider
        .generate(&suggest::card_prompt(prompt))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "suggestion request failed");
            llm_error_to_response(e)
        })?;

    let suggestion = suggest::parse_suggestion(&text).map_err(|e| {
        tracing::warn!(error = %e, "suggestion reply not parseable");
        error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    tracing::info!(headline = %suggestion.headline, "suggestion generated");
    Ok(Json(suggestion))
}

pub(crate) fn llm_error_to_status(err: &LlmError) -> StatusCode {
    match err {
        LlmError::ApiResponse { .. } | LlmError::EmptyCandidate => StatusCode::BAD_GATEWAY,
        LlmError::MissingApiKey { .. }
        | LlmError::ApiRequest(_)
        | LlmError::ApiParse(_)
        | LlmError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn llm_error_to_response(err: LlmError) -> ApiError {
    let status = llm_error_to_status(&err);
    match err {
        LlmError::ApiResponse { body, .. } => error(status, body),
        LlmError::EmptyCandidate => error(status, "Resposta vazia do Gemini"),
        LlmError::MissingApiKey { .. } => error(status, "Gemini key not configured"),
        other => error(status, other.to_string()),
    }
}

#[cfg(test)]
#[path = "suggest_test.rs"]
mod tests;
