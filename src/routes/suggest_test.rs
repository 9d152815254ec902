use std::sync::{Arc, Mutex};

use super::*;
use crate::llm::types::SuggestionProvider;

// =========================================================================
// FakeProvider
// =========================================================================

struct FakeProvider {
    reply: fn() -> Result<String, LlmError>,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn new(reply: fn() -> Result<String, LlmError>) -> Arc<Self> {
        Arc::new(Self { reply, prompts: Mutex::new(Vec::new()) })
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for FakeProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }
}

fn state_with(provider: &Arc<FakeProvider>) -> AppState {
    let provider: Arc<dyn SuggestionProvider> = provider.clone();
    AppState::new(Some(provider))
}

fn good_reply() -> Result<String, LlmError> {
    Ok("```json\n{\"headline\":\"Café Quente\",\"description\":\"O melhor da cidade.\",\
        \"headlineColor\":\"#ffffff\",\"descriptionColor\":\"#f5f5f5\",\
        \"backgroundColor\":\"#6f4e37\",\"suggestedImageKeyword\":\"coffee\"}\n```"
        .to_string())
}

async fn call(state: AppState, body: Value) -> Result<Json<AiSuggestion>, ApiError> {
    generate(State(state), Json(body)).await
}

fn error_message(err: &ApiError) -> String {
    err.1.0["error"].as_str().unwrap_or_default().to_string()
}

// =========================================================================
// generate
// =========================================================================

#[tokio::test]
async fn generate_returns_parsed_suggestion() {
    let provider = FakeProvider::new(good_reply);
    let Json(s) = call(state_with(&provider), serde_json::json!({ "prompt": "cafeteria" }))
        .await
        .unwrap();
    assert_eq!(s.headline, "Café Quente");
    assert_eq!(s.background_color.as_deref(), Some("#6f4e37"));
    assert!(s.font_family.is_none());

    let prompts = provider.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User Request: \"cafeteria\""));
}

#[tokio::test]
async fn generate_forwards_prompt_verbatim() {
    let provider = FakeProvider::new(good_reply);
    call(state_with(&provider), serde_json::json!({ "prompt": "  cafeteria  " }))
        .await
        .unwrap();
    let prompts = provider.prompts.lock().unwrap();
    assert!(prompts[0].contains("User Request: \"  cafeteria  \""));
}

#[tokio::test]
async fn generate_without_provider_is_500() {
    let err = call(AppState::default(), serde_json::json!({ "prompt": "x" }))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&err), "Gemini key not configured");
}

#[tokio::test]
async fn generate_blank_prompt_is_400() {
    let provider = FakeProvider::new(good_reply);
    for body in [
        serde_json::json!({ "prompt": "   " }),
        serde_json::json!({ "prompt": 42 }),
        serde_json::json!({}),
    ] {
        let err = call(state_with(&provider), body).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&err), "prompt é obrigatório");
    }
    assert!(provider.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn generate_upstream_error_is_502_with_body() {
    let provider = FakeProvider::new(|| Err(LlmError::ApiResponse { status: 429, body: "quota".into() }));
    let err = call(state_with(&provider), serde_json::json!({ "prompt": "x" }))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_GATEWAY);
    assert_eq!(error_message(&err), "quota");
}

#[tokio::test]
async fn generate_empty_candidate_is_502() {
    let provider = FakeProvider::new(|| Err(LlmError::EmptyCandidate));
    let err = call(state_with(&provider), serde_json::json!({ "prompt": "x" }))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::BAD_GATEWAY);
    assert_eq!(error_message(&err), "Resposta vazia do Gemini");
}

#[tokio::test]
async fn generate_unparseable_reply_is_500() {
    let provider = FakeProvider::new(|| Ok("Claro! Aqui está o seu card.".to_string()));
    let err = call(state_with(&provider), serde_json::json!({ "prompt": "x" }))
        .await
        .unwrap_err();
    assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&err).starts_with("invalid suggestion JSON"));
}

// =========================================================================
// llm_error_to_status
// =========================================================================

#[test]
fn network_failures_map_to_500() {
    assert_eq!(
        llm_error_to_status(&LlmError::ApiRequest("timeout".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(llm_error_to_status(&LlmError::ApiParse("eof".into())), StatusCode::INTERNAL_SERVER_ERROR);
}
